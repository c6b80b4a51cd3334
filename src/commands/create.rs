//! `relnotes --create [--edit]` - scaffold a new note for the current branch

use crate::core::context::NotesContext;
use crate::core::error::NotesResult;
use crate::core::vcs::{GitOracle, SystemGit};
use crate::notes::creator::NoteCreator;

/// Run the create command
pub fn run_create(ctx: &NotesContext, edit: bool) -> NotesResult<()> {
  // Outside a checkout the note just gets a generic slug
  let branch = match SystemGit::open(&ctx.cwd) {
    Ok(git) => git.current_branch()?,
    Err(e) => {
      tracing::debug!("no branch name available: {}", e);
      String::new()
    }
  };

  let creator = NoteCreator::new(&ctx.config, &ctx.notes_dir);
  let path = creator.create(&branch)?;
  println!("Created: {}", ctx.notes_dir.label(&path).display());

  if edit {
    creator.edit(&path)?;
  }
  Ok(())
}
