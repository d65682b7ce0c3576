//! Configuration file (`rowguard.json`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::scaffold::RenderFormat;
use crate::schema::ValidationMode;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON snapshot of the store catalog (required)
    pub catalog_path: PathBuf,

    /// Directory of JSON schema descriptors (default "./schemas")
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Directory generated schemas are written to (default "./src/schemas")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Author line of generated headers
    #[serde(default = "default_author")]
    pub author: String,

    /// Copyright holder of generated headers
    #[serde(default = "default_copyright")]
    pub copyright: String,

    /// Keep a timestamped copy of overwritten files (default true)
    #[serde(default = "default_true")]
    pub backup: bool,

    /// Report validation failures in full (default true)
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Generated schema format (default rust)
    #[serde(default)]
    pub format: RenderFormat,

    /// Remove `<table>_` from introspected column names (default true)
    #[serde(default = "default_true")]
    pub strip_prefix: bool,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./src/schemas")
}
fn default_author() -> String {
    "My Name <me@company.com>".to_string()
}
fn default_copyright() -> String {
    "My Company".to_string()
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err(CliError::config_error("catalog_path must not be empty"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("output_dir must not be empty"));
        }

        if self.author.trim().is_empty() {
            return Err(CliError::config_error("author must not be empty"));
        }

        Ok(())
    }

    pub fn mode(&self) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("rowguard.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, r#"{"catalog_path": "db.json"}"#);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
        assert_eq!(config.output_dir, PathBuf::from("./src/schemas"));
        assert_eq!(config.author, "My Name <me@company.com>");
        assert_eq!(config.copyright, "My Company");
        assert!(config.backup);
        assert!(config.strip_prefix);
        assert_eq!(config.format, RenderFormat::Rust);
        assert_eq!(config.mode(), ValidationMode::Strict);
    }

    #[test]
    fn test_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{"catalog_path": "db.json", "strict": false, "format": "json", "backup": false}"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.mode(), ValidationMode::Lenient);
        assert_eq!(config.format, RenderFormat::Json);
        assert!(!config.backup);
    }

    #[test]
    fn test_missing_catalog_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, r#"{"schema_dir": "s"}"#);
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "ROWGUARD_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_empty_author_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, r#"{"catalog_path": "db.json", "author": " "}"#);
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load(&temp_dir.path().join("absent.json")).is_err());
    }
}
