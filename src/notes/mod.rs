//! Release-note fragments: schema, boundary resolution, collection, rendering
//!
//! Notes are small YAML files in one directory of the repository. Each maps
//! section names to a note or list of notes. The report groups them by the
//! release that first introduced them.

pub mod collector;
pub mod creator;
pub mod report;
pub mod resolver;
pub mod schema;

use crate::core::config::NotesConfig;
use crate::core::error::{ConfigError, NotesResult, ResultExt, ValidationError};
use crate::utils::{normalize, relative_to};
use schema::NoteSchema;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The notes directory, as given and as located on disk
#[derive(Debug, Clone)]
pub struct NotesDir {
  /// Path as configured, used in messages
  pub display: PathBuf,
  /// Canonical absolute path
  pub abs: PathBuf,
}

impl NotesDir {
  /// Locate `dir` (relative to `cwd` unless absolute); it must exist
  pub fn open(cwd: &Path, dir: &Path) -> NotesResult<Self> {
    let joined = normalize(&cwd.join(dir));
    if !joined.is_dir() {
      return Err(
        ConfigError::NotesDirMissing {
          path: dir.to_path_buf(),
        }
        .into(),
      );
    }
    let abs = joined
      .canonicalize()
      .with_context(|| format!("Failed to resolve {}", joined.display()))?;

    Ok(Self {
      display: dir.to_path_buf(),
      abs,
    })
  }

  /// Path of the directory relative to a repository root
  pub fn within(&self, toplevel: &Path) -> NotesResult<PathBuf> {
    relative_to(&self.abs, toplevel).ok_or_else(|| {
      format!(
        "Release notes directory {} is outside the repository at {}",
        self.abs.display(),
        toplevel.display()
      )
      .into()
    })
  }

  /// Every note file on disk, sorted, including nested directories
  pub fn files(&self) -> NotesResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(&self.abs, &self.abs, &mut files)?;
    files.sort();
    Ok(files)
  }

  /// Path of a note for messages: the configured dir joined with the file
  pub fn label(&self, file: &Path) -> PathBuf {
    match file.strip_prefix(&self.abs) {
      Ok(rel) => self.display.join(rel),
      Err(_) => file.to_path_buf(),
    }
  }
}

/// Whether `path` below `notes_dir` can hold a note
///
/// Hidden files (`.gitkeep`, editor swap files) and anything inside a hidden
/// directory are not notes. Both paths must share a base, either the
/// repository root or the filesystem root.
pub fn is_note_file(notes_dir: &Path, path: &Path) -> bool {
  let Ok(rel) = path.strip_prefix(notes_dir) else {
    return false;
  };
  rel.file_name().is_some()
    && rel.components().all(|c| match c {
      Component::Normal(name) => name.to_str().is_some_and(|n| !n.starts_with('.')),
      _ => false,
    })
}

/// Decode a note's bytes; undecodable notes are invalid, not lossy
pub fn decode_note(file: &Path, bytes: Vec<u8>) -> Result<String, ValidationError> {
  String::from_utf8(bytes).map_err(|_| ValidationError::InvalidNote {
    file: file.to_path_buf(),
    reason: "is not valid UTF-8".to_string(),
  })
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> NotesResult<()> {
  let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
  for entry in entries {
    let path = entry?.path();
    if !is_note_file(root, &path) {
      continue;
    }
    if path.is_dir() {
      collect_files(root, &path, out)?;
    } else {
      out.push(path);
    }
  }
  Ok(())
}

/// Validate every note file on disk
///
/// Unlike report generation this does not stop at the first bad file.
/// Returns how many files were checked alongside the per-file errors.
pub fn lint_notes(config: &NotesConfig, dir: &NotesDir) -> NotesResult<(usize, Vec<ValidationError>)> {
  let schema = NoteSchema::new(config);
  let files = dir.files()?;
  let mut errors = Vec::new();

  for file in &files {
    let label = dir.label(file);
    let decoded = match fs::read(file) {
      Ok(bytes) => decode_note(&label, bytes),
      Err(e) => Err(ValidationError::InvalidNote {
        file: label.clone(),
        reason: format!("could not be read: {}", e),
      }),
    };
    let text = match decoded {
      Ok(text) => text,
      Err(e) => {
        errors.push(e);
        continue;
      }
    };
    if let Err(e) = schema.parse(&label, &text) {
      errors.push(e);
    }
  }

  tracing::debug!("linted {} note file(s), {} invalid", files.len(), errors.len());
  Ok((files.len(), errors))
}
