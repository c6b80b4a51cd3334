//! Note scaffolding
//!
//! New notes are named `<branch-slug>-<id>.yaml` so parallel branches never
//! collide, and list every configured section with an empty value so the
//! file validates as written.

use crate::core::config::NotesConfig;
use crate::core::error::{NotesError, NotesResult, ResultExt};
use crate::notes::NotesDir;
use crate::notes::schema::NoteSchema;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Slug used when the branch name yields nothing usable
const FALLBACK_SLUG: &str = "note";

/// Creates new note files in the notes directory
pub struct NoteCreator<'a> {
  config: &'a NotesConfig,
  dir: &'a NotesDir,
}

impl<'a> NoteCreator<'a> {
  pub fn new(config: &'a NotesConfig, dir: &'a NotesDir) -> Self {
    Self { config, dir }
  }

  /// Write a new scaffolded note and return its absolute path
  ///
  /// Never overwrites an existing file.
  pub fn create(&self, branch: &str) -> NotesResult<PathBuf> {
    let (path, mut file) = loop {
      let name = note_file_name(branch, Utc::now(), std::process::id());
      let path = self.dir.abs.join(&name);
      match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => break (path, file),
        // Same branch, same instant: the next timestamp gives a new id
        Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
        Err(e) => {
          return Err(e).with_context(|| format!("Failed to create {}", self.dir.label(&path).display()));
        }
      }
    };
    file
      .write_all(self.scaffold(branch).as_bytes())
      .with_context(|| format!("Failed to write {}", self.dir.label(&path).display()))?;

    tracing::debug!("created note {}", path.display());
    Ok(path)
  }

  /// Every configured section as an empty list with a commented example
  pub fn scaffold(&self, branch: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Release note for branch '{}'.\n", branch));
    out.push_str("# Each section takes a string or a list of strings.\n");
    out.push_str("# Sections left empty are ignored.\n");

    for section in &self.config.sections {
      out.push('\n');
      out.push_str(&format!("# {}\n", section.title));
      out.push_str(&format!("{}: []\n", section.name));
      out.push_str(&format!("# {}:\n#   - Describe the change.\n", section.name));
    }
    out
  }

  /// Open `path` in the user's editor, then validate the result
  pub fn edit(&self, path: &Path) -> NotesResult<()> {
    let editor = editor_command();
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");

    tracing::debug!("launching editor: {}", editor);
    let status = Command::new(program)
      .args(parts)
      .arg(path)
      .status()
      .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
      return Err(NotesError::Message {
        message: format!("Editor '{}' exited with {}", editor, status),
        context: None,
        help: Some(format!("The note was kept at {}", self.dir.label(path).display())),
      });
    }

    self.validate(path)
  }

  /// Re-read a note from disk and check it against the schema
  pub fn validate(&self, path: &Path) -> NotesResult<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    NoteSchema::new(self.config).parse(&self.dir.label(path), &text)?;
    Ok(())
  }
}

/// `$VISUAL`, then `$EDITOR`, then `vi`
fn editor_command() -> String {
  ["VISUAL", "EDITOR"]
    .iter()
    .filter_map(|var| std::env::var(var).ok())
    .find(|value| !value.trim().is_empty())
    .unwrap_or_else(|| "vi".to_string())
}

/// `<slug>-<16 hex>.yaml`, unique per branch, instant and process
pub fn note_file_name(branch: &str, now: DateTime<Utc>, pid: u32) -> String {
  let mut hasher = Sha256::new();
  hasher.update(branch.as_bytes());
  hasher.update(now.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true).as_bytes());
  hasher.update(pid.to_le_bytes());
  let digest = format!("{:x}", hasher.finalize());

  format!("{}-{}.yaml", slugify(branch), &digest[..16])
}

/// Lowercase alphanumerics separated by single dashes
pub fn slugify(branch: &str) -> String {
  let mut slug = String::new();
  for ch in branch.chars() {
    if ch.is_ascii_alphanumeric() {
      slug.push(ch.to_ascii_lowercase());
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  let slug = slug.trim_end_matches('-');

  // Detached HEAD has no meaningful branch name
  if slug.is_empty() || slug == "head" {
    FALLBACK_SLUG.to_string()
  } else {
    slug.to_string()
  }
}
