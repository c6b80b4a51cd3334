//! Error types for relnotes with contextual messages and exit codes
//!
//! Every failure is routed into one of a few categories so the top level can
//! pick an exit code and print a single, distinguishable error line.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for relnotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, unknown versions)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (bad note files, missing branch note)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for relnotes
#[derive(Debug)]
pub enum NotesError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Note validation errors
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl NotesError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    NotesError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      NotesError::Message { message, context, help } => NotesError::Message {
        message,
        context: Some(context.map(|c| format!("{}: {}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      NotesError::Io(e) => NotesError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      NotesError::Config(_) => ExitCode::User,
      NotesError::Git(_) => ExitCode::System,
      NotesError::Validation(_) => ExitCode::Validation,
      NotesError::Io(_) => ExitCode::System,
      NotesError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  ///
  /// Validation errors carry none: they are reported on a single line.
  pub fn help_message(&self) -> Option<String> {
    match self {
      NotesError::Config(e) => e.help_message(),
      NotesError::Git(e) => e.help_message(),
      NotesError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for NotesError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NotesError::Config(e) => write!(f, "{}", e),
      NotesError::Git(e) => write!(f, "{}", e),
      NotesError::Validation(e) => write!(f, "{}", e),
      NotesError::Io(e) => write!(f, "I/O error: {}", e),
      NotesError::Message { message, context, .. } => {
        if let Some(ctx) = context {
          write!(f, "{}: ", ctx)?;
        }
        write!(f, "{}", message)
      }
    }
  }
}

impl std::error::Error for NotesError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      NotesError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for NotesError {
  fn from(err: io::Error) -> Self {
    NotesError::Io(err)
  }
}

impl From<String> for NotesError {
  fn from(msg: String) -> Self {
    NotesError::message(msg)
  }
}

impl From<serde_yaml::Error> for NotesError {
  fn from(err: serde_yaml::Error) -> Self {
    NotesError::message(format!("YAML error: {}", err))
  }
}

impl From<serde_json::Error> for NotesError {
  fn from(err: serde_json::Error) -> Self {
    NotesError::message(format!("JSON error: {}", err))
  }
}

impl From<ConfigError> for NotesError {
  fn from(err: ConfigError) -> Self {
    NotesError::Config(err)
  }
}

impl From<GitError> for NotesError {
  fn from(err: GitError) -> Self {
    NotesError::Git(err)
  }
}

impl From<ValidationError> for NotesError {
  fn from(err: ValidationError) -> Self {
    NotesError::Validation(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Notes directory does not exist
  NotesDirMissing { path: PathBuf },

  /// Config file exists but could not be used
  Invalid { path: PathBuf, reason: String },

  /// Version regex does not compile
  BadVersionRegex { pattern: String, reason: String },

  /// Explicit version/previous/target does not name a known ref
  UnknownVersion { name: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotesDirMissing { .. } => {
        Some("Create the directory or point --notes-dir at an existing one.".to_string())
      }
      ConfigError::UnknownVersion { .. } => Some("List release tags with `git tag --list`.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotesDirMissing { path } => {
        write!(f, "Release notes directory not found: {}", path.display())
      }
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::BadVersionRegex { pattern, reason } => {
        write!(f, "Invalid version regex '{}': {}", pattern, reason)
      }
      ConfigError::UnknownVersion { name, reason } => {
        write!(f, "Unknown version '{}': {}", name, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run relnotes from inside a git checkout (looked in {}).",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, code, stderr } => {
        let code = code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string());
        write!(f, "Git command failed (exit {}): {}: {}", code, command, stderr.trim())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Note validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// A single note file is malformed
  InvalidNote { file: PathBuf, reason: String },

  /// Lint found problems in one or more files
  LintFailed { count: usize },

  /// Check mode found no note on the branch
  MissingNote { target: String, notes_dir: PathBuf },
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::InvalidNote { file, reason } => {
        write!(f, "{}: {}", file.display(), reason)
      }
      ValidationError::LintFailed { count } => {
        write!(f, "{} invalid release note(s)", count)
      }
      ValidationError::MissingNote { target, notes_dir } => {
        write!(
          f,
          "No release note found in {} for changes since '{}'; add one with `relnotes --create`",
          notes_dir.display(),
          target
        )
      }
    }
  }
}

/// Result type alias for relnotes
pub type NotesResult<T> = Result<T, NotesError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> NotesResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> NotesResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<NotesError>,
{
  fn context(self, ctx: impl Into<String>) -> NotesResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> NotesResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr: one prefixed line, then help for config and git errors
pub fn print_error(error: &NotesError) {
  eprintln!("❌ ERROR: {}", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}", help);
  }
}
