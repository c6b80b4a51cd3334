//! Release boundary resolution
//!
//! Turns `--version` / `--previous` and the tag history into the ordered list
//! of buckets a report covers, newest first.

use crate::core::error::{ConfigError, NotesResult};
use crate::core::vcs::{GitOracle, RevRange, TagRef};
use regex::Regex;

/// `--previous` value meaning "from the beginning of history"
pub const TAIL: &str = "TAIL";

/// A report bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
  /// Index / working-tree changes not yet committed
  Uncommitted,
  /// Commits on the current branch since the newest release tag
  Head,
  /// A release tag
  Tag(String),
}

impl Boundary {
  /// Key used in structured output
  pub fn key(&self) -> &str {
    match self {
      Boundary::Uncommitted => "Uncommitted",
      Boundary::Head => "HEAD",
      Boundary::Tag(name) => name,
    }
  }

  /// Heading used in text output
  pub fn title(&self) -> &str {
    match self {
      Boundary::Uncommitted => "Uncommitted",
      Boundary::Head => "Current Branch",
      Boundary::Tag(name) => name,
    }
  }
}

/// A bucket plus the commits it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBoundary {
  pub boundary: Boundary,
  /// Commit range; `None` for the uncommitted bucket
  pub range: Option<RevRange>,
  /// Always reported, even without notes
  pub leading: bool,
}

/// What the user asked to report on
#[derive(Debug, Clone, Default)]
pub struct VersionRequest {
  pub version: Option<String>,
  pub previous: Option<String>,
}

/// Computes report boundaries from tag history
pub struct VersionResolver<'a> {
  git: &'a dyn GitOracle,
  matcher: Regex,
}

impl<'a> VersionResolver<'a> {
  pub fn new(git: &'a dyn GitOracle, matcher: Regex) -> Self {
    Self { git, matcher }
  }

  /// Resolve the ordered boundaries for a request, newest first
  pub fn resolve(&self, request: &VersionRequest) -> NotesResult<Vec<ReleaseBoundary>> {
    let head = self.git.head_commit()?;

    let (start_ref, start_commit) = match &request.version {
      Some(version) => {
        let commit = self.resolve_tag(version)?;
        (version.clone(), Some(commit))
      }
      None => ("HEAD".to_string(), head),
    };

    let mut boundaries = Vec::new();
    if request.version.is_none() {
      boundaries.push(ReleaseBoundary {
        boundary: Boundary::Uncommitted,
        range: None,
        leading: false,
      });
    }

    // Unborn branch: nothing committed, only the synthetic buckets
    let Some(start_commit) = start_commit else {
      self.check_previous_without_history(request)?;
      boundaries.push(ReleaseBoundary {
        boundary: Boundary::Head,
        range: None,
        leading: true,
      });
      return Ok(boundaries);
    };

    let mut releases = self.release_tags(&start_ref)?;

    // Leading boundary: the named version, the tag sitting on HEAD, or HEAD
    let leading = match &request.version {
      Some(version) => Boundary::Tag(version.clone()),
      None => match releases.first() {
        Some(tag) if tag.commit == start_commit => Boundary::Tag(tag.name.clone()),
        _ => Boundary::Head,
      },
    };
    // Release tags on the leading commit would only yield empty ranges
    releases.retain(|t| t.commit != start_commit);

    let stop = self.stop_index(request, &releases)?;

    let mut refs = vec![(leading, start_ref.clone())];
    refs.extend(
      releases[..stop]
        .iter()
        .map(|t| (Boundary::Tag(t.name.clone()), t.name.clone())),
    );

    for (i, (boundary, rev)) in refs.iter().enumerate() {
      let since = releases.get(i).map(|t| t.name.clone());
      boundaries.push(ReleaseBoundary {
        boundary: boundary.clone(),
        range: Some(RevRange::new(since, rev.clone())),
        leading: i == 0,
      });
    }

    tracing::debug!(
      "resolved boundaries: {:?}",
      boundaries.iter().map(|b| b.boundary.key()).collect::<Vec<_>>()
    );
    Ok(boundaries)
  }

  /// Release tags reachable from `from`, newest first
  fn release_tags(&self, from: &str) -> NotesResult<Vec<TagRef>> {
    let tags = self.git.tags(from)?;
    let (releases, ignored): (Vec<_>, Vec<_>) = tags.into_iter().partition(|t| self.matcher.is_match(&t.name));
    if !ignored.is_empty() {
      tracing::debug!(
        "ignoring tags not matching {}: {:?}",
        self.matcher.as_str(),
        ignored.iter().map(|t| &t.name).collect::<Vec<_>>()
      );
    }
    Ok(releases)
  }

  /// How many older release tags get their own boundary
  fn stop_index(&self, request: &VersionRequest, releases: &[TagRef]) -> NotesResult<usize> {
    match request.previous.as_deref() {
      None => Ok(0),
      Some(TAIL) => Ok(releases.len()),
      Some(previous) => releases.iter().position(|t| t.name == previous).ok_or_else(|| {
        let reason = match self.git.resolve(&format!("refs/tags/{}", previous)) {
          Ok(Some(_)) => format!(
            "it is not a release tag older than '{}'",
            request.version.as_deref().unwrap_or("HEAD")
          ),
          _ => "no such tag".to_string(),
        };
        ConfigError::UnknownVersion {
          name: previous.to_string(),
          reason,
        }
        .into()
      }),
    }
  }

  fn check_previous_without_history(&self, request: &VersionRequest) -> NotesResult<()> {
    match request.previous.as_deref() {
      None | Some(TAIL) => Ok(()),
      Some(previous) => Err(
        ConfigError::UnknownVersion {
          name: previous.to_string(),
          reason: "the repository has no commits".to_string(),
        }
        .into(),
      ),
    }
  }

  fn resolve_tag(&self, version: &str) -> NotesResult<String> {
    self.git.resolve(&format!("refs/tags/{}", version))?.ok_or_else(|| {
      ConfigError::UnknownVersion {
        name: version.to_string(),
        reason: "no such tag".to_string(),
      }
      .into()
    })
  }
}
