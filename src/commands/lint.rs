//! `relnotes --lint` - validate every note file
//!
//! Reads the notes directory straight from disk, so it also checks notes that
//! were never committed. Every problem is printed before failing.

use crate::core::context::NotesContext;
use crate::core::error::{NotesResult, ValidationError};
use crate::notes::lint_notes;

/// Run the lint command
pub fn run_lint(ctx: &NotesContext) -> NotesResult<()> {
  let (checked, errors) = lint_notes(&ctx.config, &ctx.notes_dir)?;

  if errors.is_empty() {
    println!(
      "✅ {} release note(s) in {} are valid",
      checked,
      ctx.notes_dir.display.display()
    );
    return Ok(());
  }

  for error in &errors {
    eprintln!("  ❌ {}", error);
  }
  Err(ValidationError::LintFailed { count: errors.len() }.into())
}
