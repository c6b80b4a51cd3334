//! Note fragment schema: validation and strict decoding
//!
//! A fragment is a YAML mapping from section name to either a string or a
//! list of strings. Anything else is rejected, never coerced.

use crate::core::config::NotesConfig;
use crate::core::error::ValidationError;
use serde_yaml::Value;
use std::path::Path;

/// Value of one section in a note file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValue {
  /// `features: "one note"`
  Single(String),
  /// `features: ["note one", "note two"]`
  List(Vec<String>),
}

impl NoteValue {
  /// Individual notes, in file order
  pub fn notes(&self) -> Vec<&str> {
    match self {
      NoteValue::Single(s) => vec![s.as_str()],
      NoteValue::List(items) => items.iter().map(String::as_str).collect(),
    }
  }
}

/// One parsed note file, sections in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFragment {
  pub sections: Vec<(String, NoteValue)>,
}

/// Validator bound to the configured section set
pub struct NoteSchema<'a> {
  config: &'a NotesConfig,
}

impl<'a> NoteSchema<'a> {
  pub fn new(config: &'a NotesConfig) -> Self {
    Self { config }
  }

  /// Check a parsed document without decoding it
  ///
  /// Errors name the offending key and value; `file` only labels the error.
  pub fn validate(&self, file: &Path, doc: &Value) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidNote {
      file: file.to_path_buf(),
      reason,
    };

    let mapping = match doc {
      Value::Null => return Ok(()),
      Value::Mapping(m) => m,
      other => {
        return Err(invalid(format!(
          "a note must be a mapping of sections, found {}",
          describe(other)
        )));
      }
    };

    for (key, value) in mapping {
      let Value::String(section) = key else {
        return Err(invalid(format!("{} is not a valid section", render(key))));
      };
      if self.config.section(section).is_none() {
        return Err(invalid(format!(
          "'{}' is not a valid section (expected one of: {})",
          section,
          self.config.section_names().collect::<Vec<_>>().join(", ")
        )));
      }

      match value {
        Value::String(_) => {}
        Value::Sequence(items) => {
          if let Some(bad) = items.iter().find(|item| !matches!(item, Value::String(_))) {
            return Err(invalid(format!(
              "each entry in '{}' must be a simple string, found {} {}",
              section,
              describe(bad),
              render(bad)
            )));
          }
        }
        Value::Mapping(_) => {
          return Err(invalid(format!(
            "'{}' must be a string or a list of entries, found mapping {}",
            section,
            render(value)
          )));
        }
        other => {
          return Err(invalid(format!(
            "'{}' must be a string or a list of entries, found {} {}",
            section,
            describe(other),
            render(other)
          )));
        }
      }
    }

    Ok(())
  }

  /// Parse, validate and decode note file content
  pub fn parse(&self, file: &Path, text: &str) -> Result<NoteFragment, ValidationError> {
    let doc: Value = serde_yaml::from_str(text).map_err(|e| ValidationError::InvalidNote {
      file: file.to_path_buf(),
      reason: format!("not valid YAML: {}", e),
    })?;
    self.validate(file, &doc)?;
    Ok(decode(doc))
  }
}

/// Decode an already validated document
fn decode(doc: Value) -> NoteFragment {
  let Value::Mapping(mapping) = doc else {
    return NoteFragment::default();
  };

  let sections = mapping
    .into_iter()
    .filter_map(|(key, value)| {
      let Value::String(section) = key else {
        return None;
      };
      let value = match value {
        Value::String(s) => NoteValue::Single(clean(s)),
        Value::Sequence(items) => NoteValue::List(
          items
            .into_iter()
            .filter_map(|item| match item {
              Value::String(s) => Some(clean(s)),
              _ => None,
            })
            .collect(),
        ),
        _ => return None,
      };
      Some((section, value))
    })
    .collect();

  NoteFragment { sections }
}

/// Block scalars (`|`) keep a trailing newline; notes don't need it
fn clean(s: String) -> String {
  s.trim_end().to_string()
}

fn describe(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Sequence(_) => "list",
    Value::Mapping(_) => "mapping",
    Value::Tagged(_) => "tagged value",
  }
}

/// Compact one-line rendering of a value for error messages
fn render(value: &Value) -> String {
  serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}
