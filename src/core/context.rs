//! Run context - build once, pass everywhere
//!
//! Configuration and the notes directory are resolved once in main.rs and
//! handed to every command by reference. Git is opened by the commands that
//! need it, so lint and create work outside a checkout.

use crate::core::config::NotesConfig;
use crate::core::error::NotesResult;
use crate::notes::NotesDir;
use std::path::{Path, PathBuf};

/// Shared state for a single relnotes invocation
#[derive(Debug, Clone)]
pub struct NotesContext {
  /// Directory relnotes was started in (absolute)
  pub cwd: PathBuf,

  /// Loaded or default configuration
  pub config: NotesConfig,

  /// Located notes directory
  pub notes_dir: NotesDir,
}

impl NotesContext {
  /// Load configuration and locate the notes directory
  ///
  /// `config_path` skips the config search; `notes_dir` overrides the
  /// configured directory.
  pub fn build(cwd: &Path, config_path: Option<&Path>, notes_dir: Option<&Path>) -> NotesResult<Self> {
    let config = match config_path {
      Some(path) => NotesConfig::load(&cwd.join(path))?,
      None => NotesConfig::discover(cwd)?,
    };

    let dir = notes_dir.unwrap_or(config.notes_dir.as_path());
    let notes_dir = NotesDir::open(cwd, dir)?;
    tracing::debug!("notes directory: {}", notes_dir.abs.display());

    Ok(Self {
      cwd: cwd.to_path_buf(),
      config,
      notes_dir,
    })
  }
}
