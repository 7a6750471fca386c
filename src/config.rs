//! Configuration schema for archlens.
//!
//! A config file is optional. Every field has a default, so an empty file
//! (or no file at all) yields the same behaviour as `Config::default()`.

use globset::{Glob, GlobSet, GlobSetBuilder};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["archlens.yaml", ".archlens.yaml"];

lazy_static! {
    /// PlantUML layout engine names are plain lowercase words.
    static ref LAYOUT_NAME: Regex = Regex::new(r"^[a-z][a-z_]*$").unwrap();
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// File extensions (without the dot) that are analyzed.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Whether to analyze test sources such as `FooTest.java` (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns for paths to exclude (e.g. "**/generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub heuristics: Heuristics,
    #[serde(default)]
    pub diagram: DiagramConfig,
    /// Fail the run when any declared type's distance exceeds this value.
    #[serde(default)]
    pub max_distance: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: String::new(),
            name: String::new(),
            extensions: default_extensions(),
            include_test_files: None,
            excluded_paths: Vec::new(),
            heuristics: Heuristics::default(),
            diagram: DiagramConfig::default(),
            max_distance: None,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["java".to_string()]
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Look for a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Build a matcher for `excluded_paths`.
    pub fn exclusion_matcher(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|e| {
                anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e)
            })?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

/// Window sizes and limits for the heuristic scanners.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Heuristics {
    /// Bytes searched before a `class` keyword (and before singleton members)
    /// for modifiers like `abstract`, `public` or `static`.
    pub modifier_window: usize,
    /// Bytes searched before a field's type for the `private` modifier.
    pub field_window: usize,
    /// Maximum bytes between a type name and its opening brace.
    pub heritage_limit: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            modifier_window: 64,
            field_window: 64,
            heritage_limit: 512,
        }
    }
}

/// Diagram output options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiagramConfig {
    /// Layout engine written as `!pragma layout <engine>`; `None` omits it.
    #[serde(default = "default_layout")]
    pub layout: Option<String>,
    /// Whether referenced but undeclared types get placeholder nodes.
    #[serde(default = "default_true")]
    pub include_external: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            include_external: true,
        }
    }
}

fn default_layout() -> Option<String> {
    Some("smetana".to_string())
}

fn default_true() -> bool {
    true
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.extensions.is_empty() {
        anyhow::bail!("extensions must list at least one file extension");
    }
    for ext in &config.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!("invalid extension {:?}, expected e.g. \"java\"", ext);
        }
    }

    let h = &config.heuristics;
    if h.modifier_window == 0 || h.field_window == 0 || h.heritage_limit == 0 {
        anyhow::bail!("heuristic windows and limits must be greater than zero");
    }

    if let Some(layout) = &config.diagram.layout {
        if !LAYOUT_NAME.is_match(layout) {
            anyhow::bail!("invalid diagram layout {:?}", layout);
        }
    }

    if let Some(max) = config.max_distance {
        if !(0.0..=1.0).contains(&max) {
            anyhow::bail!("max_distance must be between 0 and 1, got {}", max);
        }
    }

    config.exclusion_matcher()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1"
name: "Payments"
extensions: [java, kt]
excluded_paths:
  - "**/generated/**"
heuristics:
  field_window: 32
diagram:
  layout: ~
  include_external: false
max_distance: 0.7
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "Payments");
        assert_eq!(config.extensions, vec!["java", "kt"]);
        assert_eq!(config.heuristics.field_window, 32);
        assert_eq!(config.heuristics.modifier_window, 64);
        assert_eq!(config.diagram.layout, None);
        assert!(!config.diagram.include_external);
        assert_eq!(config.max_distance, Some(0.7));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("name: x").unwrap();
        assert_eq!(config.extensions, vec!["java"]);
        assert_eq!(config.heuristics, Heuristics::default());
        assert_eq!(config.diagram, DiagramConfig::default());
        assert!(!config.should_include_test_files());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.max_distance = Some(1.5);
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.heuristics.field_window = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.diagram.layout = Some("elk; !include evil".to_string());
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.excluded_paths = vec!["[".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_exclusion_matcher() {
        let config = Config {
            excluded_paths: vec!["**/generated/**".to_string()],
            ..Default::default()
        };
        let matcher = config.exclusion_matcher().unwrap();
        assert!(matcher.is_match("src/generated/Foo.java"));
        assert!(!matcher.is_match("src/main/Foo.java"));
    }
}
