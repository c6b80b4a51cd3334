//! Utility functions for cross-platform path handling

use std::path::{Component, Path, PathBuf};

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Lexically normalize a path: drop `.` and fold `..` where possible
///
/// Used for paths that may not exist on disk, so no symlink resolution.
pub fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push("..");
        }
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// Express `path` relative to `root`, if it lies inside it
pub fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
  path.strip_prefix(root).ok().map(normalize)
}
