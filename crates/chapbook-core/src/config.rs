use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::markers::MarkerMode;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "chapbook.yml";

/// Top-level configuration for a Chapbook project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapbookConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Project files. Relative paths are resolved against the config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Title of the compiled document
    #[serde(default = "default_title")]
    pub title: String,
    /// Persisted chapter registry (JSON)
    #[serde(default = "default_registry")]
    pub registry: PathBuf,
    /// Compiled HTML output
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Base directory for relative chapter paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,
}

/// Breakpoint marker handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Fail the compile on malformed markers instead of falling back to level 2
    #[serde(default = "default_true")]
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render `$...$` / `$$...$$` in Markdown chapters as MathJax blocks
    #[serde(default = "default_true")]
    pub math: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log a summary line after every compile
    #[serde(default = "default_true")]
    pub show_compile_stats: bool,
}

fn default_title() -> String {
    "Chapbook".to_string()
}

fn default_registry() -> PathBuf {
    PathBuf::from("file_map.json")
}

fn default_output() -> PathBuf {
    PathBuf::from("main.html")
}

fn default_true() -> bool {
    true
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            registry: default_registry(),
            output: default_output(),
            source_root: None,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { math: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_compile_stats: true,
        }
    }
}

impl ChapbookConfig {
    /// Load config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn marker_mode(&self) -> MarkerMode {
        if self.markers.strict {
            MarkerMode::Strict
        } else {
            MarkerMode::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_roundtrip_defaults() {
        let config = ChapbookConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ChapbookConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = ChapbookConfig::from_yaml("project:\n  title: Handbook\n").unwrap();

        assert_eq!(config.project.title, "Handbook");
        assert_eq!(config.project.registry, PathBuf::from("file_map.json"));
        assert_eq!(config.project.output, PathBuf::from("main.html"));
        assert!(config.markers.strict);
        assert!(config.render.math);
        assert_eq!(config.marker_mode(), MarkerMode::Strict);
    }

    #[test]
    fn test_lenient_markers() {
        let yaml = "project:\n  output: out/book.html\nmarkers:\n  strict: false\nrender:\n  math: false\n";
        let config = ChapbookConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.marker_mode(), MarkerMode::Lenient);
        assert!(!config.render.math);
        assert_eq!(config.project.output, PathBuf::from("out/book.html"));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ChapbookConfig::from_yaml("project: [1, 2").is_err());
    }
}
