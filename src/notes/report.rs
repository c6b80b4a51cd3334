//! Aggregated report model and rendering

use crate::core::config::NotesConfig;
use crate::core::error::NotesResult;
use crate::notes::resolver::Boundary;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::BTreeMap;

/// One note in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEntry {
  pub note: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit: Option<String>,
}

/// Notes collected for one boundary
#[derive(Debug, Clone)]
pub struct BoundaryNotes {
  pub boundary: Boundary,
  /// Always reported, even when empty
  pub leading: bool,
  /// Section name -> entries in collection order
  pub sections: BTreeMap<String, Vec<NoteEntry>>,
}

impl BoundaryNotes {
  pub fn new(boundary: Boundary, leading: bool) -> Self {
    Self {
      boundary,
      leading,
      sections: BTreeMap::new(),
    }
  }

  pub fn push(&mut self, section: &str, entry: NoteEntry) {
    self.sections.entry(section.to_string()).or_default().push(entry);
  }

  pub fn is_empty(&self) -> bool {
    self.sections.values().all(Vec::is_empty)
  }
}

/// Boundary -> Section -> entries, newest boundary first
#[derive(Debug, Clone, Default)]
pub struct Report {
  pub boundaries: Vec<BoundaryNotes>,
}

impl Report {
  /// Look up a boundary by its structured-output key
  #[cfg(test)]
  pub fn get(&self, key: &str) -> Option<&BoundaryNotes> {
    self.boundaries.iter().find(|b| b.boundary.key() == key)
  }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// Markdown text (default)
  Text,
  /// Structured YAML
  Yaml,
  /// Structured JSON
  Json,
}

/// Renders a report in configured section order
pub struct ReportRenderer<'a> {
  config: &'a NotesConfig,
  blame: bool,
}

impl<'a> ReportRenderer<'a> {
  pub fn new(config: &'a NotesConfig, blame: bool) -> Self {
    Self { config, blame }
  }

  pub fn render(&self, report: &Report, format: ReportFormat) -> NotesResult<String> {
    match format {
      ReportFormat::Text => Ok(self.to_text(report)),
      ReportFormat::Yaml => Ok(serde_yaml::to_string(&self.structured(report))?),
      ReportFormat::Json => {
        let mut out = serde_json::to_string_pretty(&self.structured(report))?;
        out.push('\n');
        Ok(out)
      }
    }
  }

  /// Markdown: boundary heading, section headings, bullets
  pub fn to_text(&self, report: &Report) -> String {
    let mut output = String::new();

    for boundary in &report.boundaries {
      output.push_str(&format!("# {}\n\n", boundary.boundary.title()));

      for section in &self.config.sections {
        let Some(entries) = boundary.sections.get(&section.name) else {
          continue;
        };
        if entries.is_empty() {
          continue;
        }

        output.push_str(&format!("## {}\n\n", section.title));
        for entry in entries {
          output.push_str(&bullet(&entry.note));
          if self.blame
            && let Some(author) = &entry.author
          {
            match &entry.commit {
              Some(commit) => output.push_str(&format!(" (by {}, {})", author, commit)),
              None => output.push_str(&format!(" (by {})", author)),
            }
          }
          output.push('\n');
        }
        output.push('\n');
      }
    }

    output
  }

  fn structured<'r>(&'r self, report: &'r Report) -> StructuredReport<'r> {
    StructuredReport {
      report,
      config: self.config,
    }
  }
}

/// `- note`, continuation lines indented under the bullet
fn bullet(note: &str) -> String {
  let mut lines = note.lines();
  let mut out = format!("- {}", lines.next().unwrap_or_default());
  for line in lines {
    out.push('\n');
    if !line.is_empty() {
      out.push_str("  ");
      out.push_str(line);
    }
  }
  out
}

/// Ordered mapping view of a report: boundary key -> section -> entries
struct StructuredReport<'a> {
  report: &'a Report,
  config: &'a NotesConfig,
}

impl Serialize for StructuredReport<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.report.boundaries.len()))?;
    for boundary in &self.report.boundaries {
      map.serialize_entry(
        boundary.boundary.key(),
        &StructuredSections {
          notes: boundary,
          config: self.config,
        },
      )?;
    }
    map.end()
  }
}

struct StructuredSections<'a> {
  notes: &'a BoundaryNotes,
  config: &'a NotesConfig,
}

impl Serialize for StructuredSections<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let present: Vec<_> = self
      .config
      .sections
      .iter()
      .filter_map(|s| {
        self
          .notes
          .sections
          .get(&s.name)
          .filter(|entries| !entries.is_empty())
          .map(|entries| (s.name.as_str(), entries))
      })
      .collect();

    let mut map = serializer.serialize_map(Some(present.len()))?;
    for (name, entries) in present {
      map.serialize_entry(name, entries)?;
    }
    map.end()
  }
}
