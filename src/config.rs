//! Configuration for the flight parser
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (flights.toml)
//! - Environment variables (FLIGHTS__*)
//!
//! ## Example config file (flights.toml):
//! ```toml
//! [output]
//! db_path = "db.json"
//! errors_path = "errors.txt"
//! response_dir = "responses"
//! format = "pretty"
//!
//! [identity]
//! student_id = "241ADB008"
//! first_name = "Delwin"
//! last_name = "Biju"
//!
//! [ingest]
//! extension = "csv"
//! ```

use std::path::{Path, PathBuf};

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Identity used in response file names
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Source selection
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Record database written after parsing CSV input
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Diagnostics file written after parsing CSV input
    #[serde(default = "default_errors_path")]
    pub errors_path: PathBuf,

    /// Directory that receives query response files
    #[serde(default = "default_response_dir")]
    pub response_dir: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_student_id")]
    pub student_id: String,
    #[serde(default = "default_first_name")]
    pub first_name: String,
    #[serde(default = "default_last_name")]
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// File extension picked up when ingesting a directory
    #[serde(default = "default_extension")]
    pub extension: String,
}

// Default value functions
fn default_db_path() -> PathBuf {
    PathBuf::from("db.json")
}

fn default_errors_path() -> PathBuf {
    PathBuf::from("errors.txt")
}

fn default_response_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_student_id() -> String {
    "241ADB008".to_string()
}

fn default_first_name() -> String {
    "Delwin".to_string()
}

fn default_last_name() -> String {
    "Biju".to_string()
}

fn default_extension() -> String {
    "csv".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            errors_path: default_errors_path(),
            response_dir: default_response_dir(),
            format: OutputFormat::Pretty,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            student_id: default_student_id(),
            first_name: default_first_name(),
            last_name: default_last_name(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

impl FlightConfig {
    /// Load configuration, layering an explicit file on top of the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        for location in ["flights.toml", ".flights.toml", "config/flights.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "flights", "flight-parser") {
            let xdg_config = dirs.config_dir().join("flights.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // FLIGHTS__OUTPUT__DB_PATH=... etc.
        builder = builder.add_source(
            Environment::with_prefix("FLIGHTS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FlightConfig::default();
        assert_eq!(config.output.db_path, PathBuf::from("db.json"));
        assert_eq!(config.output.errors_path, PathBuf::from("errors.txt"));
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.ingest.extension, "csv");
    }

    #[test]
    fn test_serialize_config() {
        let toml_str = toml::to_string_pretty(&FlightConfig::default()).unwrap();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[identity]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[output]\ndb_path = \"flights.json\"\nformat = \"compact\"\n\n[identity]\nfirst_name = \"Anna\"\n",
        )
        .unwrap();

        let config = FlightConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.output.db_path, PathBuf::from("flights.json"));
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert_eq!(config.output.errors_path, PathBuf::from("errors.txt"));
        assert_eq!(config.identity.first_name, "Anna");
        assert_eq!(config.identity.last_name, "Biju");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut config = FlightConfig::default();
        config.output.db_path = PathBuf::from("out/flights.json");
        config.output.format = OutputFormat::Compact;
        config.identity.student_id = "123ABC".to_string();
        config.ingest.extension = "txt".to_string();
        config.save(&path).unwrap();

        let loaded = FlightConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.output.db_path, PathBuf::from("out/flights.json"));
        assert_eq!(loaded.output.format, OutputFormat::Compact);
        assert_eq!(loaded.identity, config.identity);
        assert_eq!(loaded.ingest.extension, "txt");
    }

    #[test]
    fn test_missing_explicit_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlightConfig::load_from(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, crate::error::FlightError::Config(_)));
    }
}
