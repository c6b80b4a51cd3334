//! Note collection: attribute each note file to exactly one boundary
//!
//! A note belongs to the oldest reported boundary whose commits added or
//! changed it. Uncommitted changes take precedence over history. Content is
//! always read as of the boundary that owns the note, so later edits to an
//! already released note do not rewrite that release.

use crate::core::error::{NotesResult, ResultExt};
use crate::core::vcs::{GitOracle, LogEntry, RevRange};
use crate::notes::report::{BoundaryNotes, NoteEntry, Report};
use crate::notes::resolver::{Boundary, ReleaseBoundary};
use crate::notes::schema::{NoteFragment, NoteSchema};
use crate::notes::{decode_note, is_note_file};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Who last touched a note within its boundary
#[derive(Debug, Clone, PartialEq, Eq)]
struct Provenance {
  author: String,
  commit: String,
}

/// Gathers note files per boundary and builds the report
pub struct NoteCollector<'a> {
  git: &'a dyn GitOracle,
  schema: NoteSchema<'a>,
  /// Notes directory relative to the repository root
  notes_dir: PathBuf,
  blame: bool,
}

impl<'a> NoteCollector<'a> {
  pub fn new(git: &'a dyn GitOracle, schema: NoteSchema<'a>, notes_dir: PathBuf, blame: bool) -> Self {
    Self {
      git,
      schema,
      notes_dir,
      blame,
    }
  }

  /// Collect notes for `boundaries` (newest first) into a report
  ///
  /// Stops at the first invalid note.
  pub fn collect(&self, boundaries: &[ReleaseBoundary]) -> NotesResult<Report> {
    let mut buckets: Vec<BoundaryNotes> = boundaries
      .iter()
      .map(|b| BoundaryNotes::new(b.boundary.clone(), b.leading))
      .collect();
    let mut attributed: HashSet<PathBuf> = HashSet::new();

    // Uncommitted first: a modified note is reported with its working copy
    for (idx, boundary) in boundaries.iter().enumerate() {
      if boundary.boundary == Boundary::Uncommitted {
        self.collect_uncommitted(&mut buckets[idx], &mut attributed)?;
      }
    }

    // Then history, oldest boundary first, so a note lands where it was introduced
    for (idx, boundary) in boundaries.iter().enumerate().rev() {
      if let Some(range) = &boundary.range {
        self.collect_range(range, &mut buckets[idx], &mut attributed)?;
      }
    }

    buckets.retain(|b| b.leading || !b.is_empty());
    Ok(Report { boundaries: buckets })
  }

  fn collect_uncommitted(&self, bucket: &mut BoundaryNotes, attributed: &mut HashSet<PathBuf>) -> NotesResult<()> {
    let base = self.git.head_commit()?.map(|_| "HEAD");
    let mut paths = self.git.diff_names(base, &self.notes_dir)?;
    paths.sort();
    paths.dedup();

    for path in paths {
      if !is_note_file(&self.notes_dir, &path) || !attributed.insert(path.clone()) {
        continue;
      }
      let abs = self.git.toplevel().join(&path);
      if !abs.is_file() {
        tracing::debug!("{} deleted in working tree, skipping", path.display());
        continue;
      }
      let bytes = fs::read(&abs).with_context(|| format!("Failed to read {}", path.display()))?;
      let fragment = self.parse(&path, bytes)?;
      add_fragment(bucket, fragment, None);
    }
    Ok(())
  }

  fn collect_range(
    &self,
    range: &RevRange,
    bucket: &mut BoundaryNotes,
    attributed: &mut HashSet<PathBuf>,
  ) -> NotesResult<()> {
    let log = self.git.log(range, &self.notes_dir)?;

    for (path, entry) in newest_touch(&log) {
      if !is_note_file(&self.notes_dir, &path) || attributed.contains(&path) {
        continue;
      }
      // Notes removed from the working tree are no longer reported anywhere
      if !self.git.toplevel().join(&path).is_file() {
        tracing::debug!("{} no longer exists, skipping", path.display());
        attributed.insert(path);
        continue;
      }
      let Some(bytes) = self.git.show(&range.until, &path)? else {
        // Changed in range but gone at its end: belongs to an older boundary
        continue;
      };
      attributed.insert(path.clone());
      tracing::debug!(
        "{} attributed to {} (last touched in {})",
        path.display(),
        bucket.boundary.key(),
        entry.commit
      );

      let fragment = self.parse(&path, bytes)?;
      let provenance = self.blame.then(|| Provenance {
        author: entry.author.clone(),
        commit: entry.short.clone(),
      });
      add_fragment(bucket, fragment, provenance);
    }
    Ok(())
  }

  fn parse(&self, path: &Path, bytes: Vec<u8>) -> NotesResult<NoteFragment> {
    let text = decode_note(path, bytes)?;
    Ok(self.schema.parse(path, &text)?)
  }
}

/// Each path touched in a newest-first log, with the newest commit touching it, sorted by path
fn newest_touch(log: &[LogEntry]) -> BTreeMap<PathBuf, &LogEntry> {
  let mut touched = BTreeMap::new();
  for entry in log {
    for path in &entry.paths {
      touched.entry(path.clone()).or_insert(entry);
    }
  }
  touched
}

fn add_fragment(bucket: &mut BoundaryNotes, fragment: NoteFragment, provenance: Option<Provenance>) {
  for (section, value) in fragment.sections {
    for note in value.notes() {
      bucket.push(
        &section,
        NoteEntry {
          note: note.to_string(),
          author: provenance.as_ref().map(|p| p.author.clone()),
          commit: provenance.as_ref().map(|p| p.commit.clone()),
        },
      );
    }
  }
}
