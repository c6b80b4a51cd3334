//! System git backend
//!
//! Runs git as a subprocess and hands back captured stdout. Every call blocks
//! until git exits.

use crate::core::error::{GitError, NotesError, NotesResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  ///
  /// This performs ONE subprocess call to find the working tree root.
  pub fn open(path: &Path) -> NotesResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(NotesError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(NotesError::Git(GitError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        code: output.status.code(),
        stderr: stderr.to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = PathBuf::from(stdout.trim());
    // rev-parse resolves symlinks; keep the same form for prefix stripping
    let work_tree = work_tree.canonicalize().unwrap_or(work_tree);

    Ok(Self { work_tree })
  }

  /// Run a git subcommand and return its stdout
  ///
  /// Non-zero exit is a `GitError::CommandFailed` carrying the exit code and
  /// stderr.
  pub fn run(&self, args: &[&str]) -> NotesResult<String> {
    let output = self.run_checked(args)?;

    if !output.status.success() {
      return Err(NotesError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Run a git subcommand and return the raw output, successful or not
  ///
  /// For callers that tell an expected failure (missing blob, unborn HEAD)
  /// apart from a real one.
  pub fn run_checked(&self, args: &[&str]) -> NotesResult<Output> {
    tracing::debug!("git {}", args.join(" "));
    self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.first().unwrap_or(&"")))
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the working tree root
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force stable, parseable output
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
    cmd.arg("-c").arg("log.showSignature=false");
    cmd.arg("-c").arg("color.ui=false");
    cmd.arg("--no-pager");

    cmd
  }
}
