use crate::core::error::{ConfigError, NotesResult};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory holding note fragments
pub const DEFAULT_NOTES_DIR: &str = "releasenotes";

/// Tags count as releases when they look like `1.2`, `v1.2.3`, `2.0.0-rc1`, ...
pub const DEFAULT_VERSION_REGEX: &str = r"^[vV]?\d+(\.\d+)+";

/// Configuration for relnotes
/// Searched in order: relnotes.toml, .relnotes.toml, .config/relnotes.toml, relnotes.yaml
#[derive(Debug, Clone, Deserialize)]
pub struct NotesConfig {
  /// Notes directory, relative to the working directory
  #[serde(default = "default_notes_dir")]
  pub notes_dir: PathBuf,

  /// Pattern a tag name must match to count as a release
  #[serde(default = "default_version_regex")]
  pub version_regex: String,

  /// Recognized sections, in report order
  #[serde(default = "default_sections")]
  pub sections: Vec<SectionConfig>,
}

/// One recognized note section
///
/// ```toml
/// [[sections]]
/// name = "features"
/// title = "New Features"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionConfig {
  /// Key used in note files
  pub name: String,
  /// Heading used in text reports
  pub title: String,
}

impl SectionConfig {
  fn new(name: &str, title: &str) -> Self {
    Self {
      name: name.to_string(),
      title: title.to_string(),
    }
  }
}

fn default_notes_dir() -> PathBuf {
  PathBuf::from(DEFAULT_NOTES_DIR)
}

fn default_version_regex() -> String {
  DEFAULT_VERSION_REGEX.to_string()
}

fn default_sections() -> Vec<SectionConfig> {
  vec![
    SectionConfig::new("release_summary", "Release Summary"),
    SectionConfig::new("features", "New Features"),
    SectionConfig::new("known_issues", "Known Issues"),
    SectionConfig::new("upgrade", "Upgrade Notes"),
    SectionConfig::new("deprecations", "Deprecations"),
    SectionConfig::new("security", "Security Issues"),
    SectionConfig::new("fixes", "Bug Fixes"),
    SectionConfig::new("other", "Other Notes"),
  ]
}

impl Default for NotesConfig {
  fn default() -> Self {
    Self {
      notes_dir: default_notes_dir(),
      version_regex: default_version_regex(),
      sections: default_sections(),
    }
  }
}

impl NotesConfig {
  /// Find config file in search order
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("relnotes.toml"),
      path.join(".relnotes.toml"),
      path.join(".config").join("relnotes.toml"),
      path.join("relnotes.yaml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the search path, falling back to built-in defaults
  pub fn discover(path: &Path) -> NotesResult<Self> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load(&config_path),
      None => {
        tracing::debug!("no relnotes config under {}, using defaults", path.display());
        Ok(Self::default())
      }
    }
  }

  /// Load a specific config file (TOML, or YAML by extension)
  pub fn load(config_path: &Path) -> NotesResult<Self> {
    let invalid = |reason: String| ConfigError::Invalid {
      path: config_path.to_path_buf(),
      reason,
    };

    let content = fs::read_to_string(config_path).map_err(|e| invalid(e.to_string()))?;
    let is_yaml = matches!(
      config_path.extension().and_then(|e| e.to_str()),
      Some("yaml") | Some("yml")
    );

    let config: NotesConfig = if is_yaml {
      // An empty YAML document means "all defaults"
      if content.trim().is_empty() {
        NotesConfig::default()
      } else {
        serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?
      }
    } else {
      toml_edit::de::from_str(&content).map_err(|e| invalid(e.to_string()))?
    };

    config.validate().map_err(invalid)?;
    tracing::debug!(
      "loaded config from {} ({} sections)",
      config_path.display(),
      config.sections.len()
    );
    Ok(config)
  }

  /// Validate the section list and version regex
  pub fn validate(&self) -> Result<(), String> {
    if self.sections.is_empty() {
      return Err("at least one section must be configured".to_string());
    }

    let mut seen = HashSet::new();
    for section in &self.sections {
      if section.name.trim().is_empty() {
        return Err("section names must not be empty".to_string());
      }
      if !seen.insert(section.name.as_str()) {
        return Err(format!("section '{}' is configured twice", section.name));
      }
    }

    Regex::new(&self.version_regex).map_err(|e| format!("invalid version_regex: {}", e))?;
    Ok(())
  }

  /// Compile the version regex, honoring an optional override
  pub fn version_matcher(&self, override_pattern: Option<&str>) -> NotesResult<Regex> {
    let pattern = override_pattern.unwrap_or(&self.version_regex);
    Regex::new(pattern).map_err(|e| {
      ConfigError::BadVersionRegex {
        pattern: pattern.to_string(),
        reason: e.to_string(),
      }
      .into()
    })
  }

  /// Look up a section by note-file key
  pub fn section(&self, name: &str) -> Option<&SectionConfig> {
    self.sections.iter().find(|s| s.name == name)
  }

  /// Section names in report order
  pub fn section_names(&self) -> impl Iterator<Item = &str> {
    self.sections.iter().map(|s| s.name.as_str())
  }
}
