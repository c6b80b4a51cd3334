//! Git access for the notes engine
//!
//! Everything the resolver and collector need from version control goes
//! through [`GitOracle`]. [`SystemGit`] answers it by shelling out to git;
//! unit tests answer it from memory.

pub mod system_git;
mod system_git_ops;

use crate::core::error::NotesResult;
use std::path::{Path, PathBuf};

pub use system_git::SystemGit;

/// A tag pointing at a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
  pub name: String,
  pub commit: String,
}

/// A revision range `since..until`; `since == None` means "from the root"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevRange {
  pub since: Option<String>,
  pub until: String,
}

impl RevRange {
  pub fn new(since: Option<String>, until: impl Into<String>) -> Self {
    Self {
      since,
      until: until.into(),
    }
  }

  /// Render as a git revision argument
  pub fn to_rev_arg(&self) -> String {
    match &self.since {
      Some(since) => format!("{}..{}", since, self.until),
      None => self.until.clone(),
    }
  }
}

/// One commit from a path-scoped log, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
  pub commit: String,
  pub short: String,
  pub author: String,
  /// Paths touched under the filter, relative to the repository root
  pub paths: Vec<PathBuf>,
}

/// Read-only questions the notes engine asks version control
pub trait GitOracle {
  /// Working tree root; all returned paths are relative to it
  fn toplevel(&self) -> &Path;

  /// Commit HEAD points at, `None` for an unborn branch
  fn head_commit(&self) -> NotesResult<Option<String>>;

  /// Current branch name (`HEAD` when detached)
  fn current_branch(&self) -> NotesResult<String>;

  /// Resolve a revision to a commit, `None` if it does not exist
  fn resolve(&self, rev: &str) -> NotesResult<Option<String>>;

  /// Tags reachable from `from`, newest first in history order
  fn tags(&self, from: &str) -> NotesResult<Vec<TagRef>>;

  /// Commits in `range` touching `path`, newest first
  fn log(&self, range: &RevRange, path: &Path) -> NotesResult<Vec<LogEntry>>;

  /// Tracked paths under `path` whose index or working-tree state differs
  /// from `base` (the empty tree when `None`)
  fn diff_names(&self, base: Option<&str>, path: &Path) -> NotesResult<Vec<PathBuf>>;

  /// Blob content of `path` at `rev`, `None` if it does not exist there
  fn show(&self, rev: &str, path: &Path) -> NotesResult<Option<Vec<u8>>>;
}
