//! GitOracle implementation for SystemGit (tags, logs, diffs, blobs)

use super::system_git::SystemGit;
use super::{GitOracle, LogEntry, RevRange, TagRef};
use crate::core::error::{GitError, NotesError, NotesResult};
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};

/// Record separator between log entries
const RECORD_SEP: char = '\x1e';
/// Field separator inside a log header
const FIELD_SEP: char = '\x1f';

impl GitOracle for SystemGit {
  fn toplevel(&self) -> &Path {
    &self.work_tree
  }

  fn head_commit(&self) -> NotesResult<Option<String>> {
    self.resolve("HEAD")
  }

  fn current_branch(&self) -> NotesResult<String> {
    // symbolic-ref works on unborn branches, unlike rev-parse --abbrev-ref
    let output = self.run_checked(&["symbolic-ref", "--short", "-q", "HEAD"])?;
    if !output.status.success() {
      return Ok("HEAD".to_string()); // Detached HEAD
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  fn resolve(&self, rev: &str) -> NotesResult<Option<String>> {
    let spec = format!("{}^{{commit}}", rev);
    let output = self.run_checked(&["rev-parse", "--verify", "--quiet", &spec])?;
    if !output.status.success() {
      return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
  }

  fn tags(&self, from: &str) -> NotesResult<Vec<TagRef>> {
    let format = format!("--format=%H{}%D", FIELD_SEP);
    let stdout = self.run(&[
      "log",
      "--topo-order",
      "--simplify-by-decoration",
      "--decorate-refs=refs/tags/",
      &format,
      from,
      "--",
    ])?;
    Ok(parse_tag_decorations(&stdout))
  }

  fn log(&self, range: &RevRange, path: &Path) -> NotesResult<Vec<LogEntry>> {
    let format = format!("--format={}%H{}%h{}%an", RECORD_SEP, FIELD_SEP, FIELD_SEP);
    let rev = range.to_rev_arg();
    let pathspec = pathspec(path);
    let stdout = self.run(&[
      "log",
      &format,
      "--name-only",
      "--no-renames",
      "--diff-filter=ACMR",
      &rev,
      "--",
      &pathspec,
    ])?;
    parse_log_output(&stdout)
  }

  fn diff_names(&self, base: Option<&str>, path: &Path) -> NotesResult<Vec<PathBuf>> {
    let pathspec = pathspec(path);
    let mut args = vec!["diff", "--name-only", "--no-renames"];
    match base {
      Some(base) => args.push(base),
      // Unborn branch: staged files against the empty tree
      None => args.push("--cached"),
    }
    args.extend(["--", pathspec.as_str()]);

    let stdout = self.run(&args)?;
    Ok(parse_name_list(&stdout))
  }

  fn show(&self, rev: &str, path: &Path) -> NotesResult<Option<Vec<u8>>> {
    let spec = format!("{}:{}", rev, path_to_git_format(path));
    let output = self.run_checked(&["show", &spec])?;

    if output.status.success() {
      return Ok(Some(output.stdout));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("does not exist") || stderr.contains("exists on disk, but not in") {
      return Ok(None);
    }

    Err(NotesError::Git(GitError::CommandFailed {
      command: format!("git show {}", spec),
      code: output.status.code(),
      stderr: stderr.to_string(),
    }))
  }
}

fn pathspec(path: &Path) -> String {
  if path.as_os_str().is_empty() {
    ".".to_string()
  } else {
    path_to_git_format(path)
  }
}

/// Parse `%H<US>%D` lines into tags, keeping git's order
///
/// A commit may carry several tags: `tag: v1.0, tag: v1.0-final`.
fn parse_tag_decorations(stdout: &str) -> Vec<TagRef> {
  let mut tags = Vec::new();

  for line in stdout.lines() {
    let Some((commit, decorations)) = line.split_once(FIELD_SEP) else {
      continue;
    };
    for decoration in decorations.split(", ") {
      if let Some(name) = decoration.trim().strip_prefix("tag: ") {
        tags.push(TagRef {
          name: name.to_string(),
          commit: commit.trim().to_string(),
        });
      }
    }
  }

  tags
}

/// Parse `<RS>%H<US>%h<US>%an` headers followed by `--name-only` paths
fn parse_log_output(stdout: &str) -> NotesResult<Vec<LogEntry>> {
  let mut entries = Vec::new();

  for record in stdout.split(RECORD_SEP) {
    if record.trim().is_empty() {
      continue;
    }

    let mut lines = record.lines();
    let header = lines.next().unwrap_or_default();
    let mut fields = header.split(FIELD_SEP);
    let (Some(commit), Some(short), Some(author)) = (fields.next(), fields.next(), fields.next()) else {
      return Err(NotesError::message(format!("Malformed git log header: {:?}", header)));
    };

    entries.push(LogEntry {
      commit: commit.to_string(),
      short: short.to_string(),
      author: author.to_string(),
      paths: parse_name_list(&lines.collect::<Vec<_>>().join("\n")),
    });
  }

  Ok(entries)
}

fn parse_name_list(stdout: &str) -> Vec<PathBuf> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(PathBuf::from)
    .collect()
}
