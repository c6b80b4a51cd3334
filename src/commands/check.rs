//! `relnotes --check` - require a release note on the current branch
//!
//! Counts note files added or changed between the target branch and HEAD,
//! plus tracked notes changed in the index or working tree. Every counted
//! note must be valid, and there must be at least one.
//!
//! Target resolution:
//! - `--target <ref>`
//! - `GITHUB_BASE_REF` (GitHub Actions pull requests)
//! - `CI_MERGE_REQUEST_TARGET_BRANCH_NAME` (GitLab merge requests)
//! - `main`

use crate::core::context::NotesContext;
use crate::core::error::{ConfigError, NotesResult, ResultExt, ValidationError};
use crate::core::vcs::{GitOracle, RevRange, SystemGit};
use crate::notes::{decode_note, is_note_file};
use crate::notes::schema::NoteSchema;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// Branch compared against when nothing else names one
const DEFAULT_TARGET: &str = "main";

/// CI variables naming the branch a change will merge into, in lookup order
const TARGET_ENV_VARS: &[&str] = &["GITHUB_BASE_REF", "CI_MERGE_REQUEST_TARGET_BRANCH_NAME"];

/// Run the check command
pub fn run_check(ctx: &NotesContext, target: Option<String>) -> NotesResult<()> {
  let target = target_branch(target, |var| std::env::var(var).ok());
  let git = SystemGit::open(&ctx.cwd)?;

  let notes = check_branch(ctx, &git, &target)?;
  println!(
    "✅ {} release note(s) on this branch since '{}':",
    notes.len(),
    target
  );
  for note in &notes {
    println!("  {}", note.display());
  }
  Ok(())
}

/// Pick the target from the flag, then CI variables, then the default
fn target_branch(flag: Option<String>, env: impl Fn(&str) -> Option<String>) -> String {
  flag
    .or_else(|| {
      TARGET_ENV_VARS
        .iter()
        .filter_map(|var| env(var))
        .find(|value| !value.trim().is_empty())
    })
    .unwrap_or_else(|| DEFAULT_TARGET.to_string())
}

/// Validate the branch's notes and return their root-relative paths
pub fn check_branch(ctx: &NotesContext, git: &dyn GitOracle, target: &str) -> NotesResult<Vec<PathBuf>> {
  let base = resolve_target(git, target)?;
  let notes_dir = ctx.notes_dir.within(git.toplevel())?;

  let mut candidates = BTreeSet::new();
  let head = git.head_commit()?;
  if head.is_some() {
    for entry in git.log(&RevRange::new(Some(base), "HEAD"), &notes_dir)? {
      candidates.extend(entry.paths);
    }
  }
  candidates.extend(git.diff_names(head.as_ref().map(|_| "HEAD"), &notes_dir)?);

  let schema = NoteSchema::new(&ctx.config);
  let mut found = Vec::new();
  for path in candidates {
    if !is_note_file(&notes_dir, &path) {
      continue;
    }
    let abs = git.toplevel().join(&path);
    // Deleting a note does not count as adding one
    if !abs.is_file() {
      continue;
    }
    let bytes = fs::read(&abs).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = decode_note(&path, bytes)?;
    schema.parse(&path, &text)?;
    found.push(path);
  }

  if found.is_empty() {
    return Err(
      ValidationError::MissingNote {
        target: target.to_string(),
        notes_dir: ctx.notes_dir.display.clone(),
      }
      .into(),
    );
  }
  tracing::debug!("notes since {}: {:?}", target, found);
  Ok(found)
}

/// The target as given, or its `origin/` remote-tracking branch
fn resolve_target(git: &dyn GitOracle, target: &str) -> NotesResult<String> {
  for candidate in [target.to_string(), format!("origin/{}", target)] {
    if let Some(commit) = git.resolve(&candidate)? {
      tracing::debug!("check target {} is {}", candidate, commit);
      return Ok(commit);
    }
  }
  Err(
    ConfigError::UnknownVersion {
      name: target.to_string(),
      reason: "no such branch or commit".to_string(),
    }
    .into(),
  )
}
