//! Configuration loading for VarSync.
//!
//! [`ConfigLoader`] locates `config.toml`, deserializes it and validates the
//! result. A missing file is not an error: the defaults are used instead.
//!
//! ```rust,ignore
//! use varsync_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("alias depth: {}", config.sync.max_alias_depth),
//!     Err(e) => {
//!         varsync_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration loading failed: {}", e);
//!     }
//! }
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::paths::get_app_config_dir;

const CONFIG_FILE_NAME: &str = "config.toml";
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 2] = ["text", "json"];

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `config.toml` from the per-user configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryUnavailable`] if no home directory can be
    /// determined, and read/parse/validation errors otherwise.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let config_path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from_path(&config_path)
    }

    /// Loads a configuration file from an explicit path.
    ///
    /// A missing or blank file yields the validated default configuration.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "Loaded configuration file");
                Self::load_from_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file found, using defaults");
                Self::validate_config(CoreConfig::default())
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Parses and validates configuration from a TOML string.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        if content.trim().is_empty() {
            return Self::validate_config(CoreConfig::default());
        }
        let config: CoreConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Self::validate_config(config)
    }

    /// Normalizes and validates a configuration.
    ///
    /// Log level and format are lower-cased; every engine name must be
    /// non-empty and the alias depth must allow at least one hop.
    pub fn validate_config(mut config: CoreConfig) -> Result<CoreConfig, CoreError> {
        config.logging.level = config.logging.level.to_lowercase();
        if !VALID_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(validation(format!(
                "Invalid log level '{}'. Expected one of {:?}",
                config.logging.level, VALID_LEVELS
            )));
        }

        config.logging.format = config.logging.format.to_lowercase();
        if !VALID_FORMATS.contains(&config.logging.format.as_str()) {
            return Err(validation(format!(
                "Invalid log format '{}'. Expected one of {:?}",
                config.logging.format, VALID_FORMATS
            )));
        }

        if config.sync.max_alias_depth == 0 {
            return Err(validation("sync.max_alias_depth must be at least 1".to_string()));
        }

        let names = [
            ("sync.primitives_collection", &config.sync.primitives_collection),
            ("sync.primitive_mode_name", &config.sync.primitive_mode_name),
            ("sync.default_mode_name", &config.sync.default_mode_name),
            ("sync.system_theme_id", &config.sync.system_theme_id),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(validation(format!("{} must not be empty", field)));
            }
        }

        Ok(config)
    }
}

fn validation(message: String) -> CoreError {
    CoreError::Config(ConfigError::ValidationError(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_load_from_path_reads_sync_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[sync]\nmax_alias_depth = 3\nprimitives_collection = \"Base\"").unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.sync.max_alias_depth, 3);
        assert_eq!(config.sync.primitives_collection, "Base");
        assert_eq!(config.sync.default_mode_name, "Mode 1");
    }

    #[test]
    fn test_level_and_format_are_normalized() {
        let config = ConfigLoader::load_from_str("[logging]\nlevel = \"DEBUG\"\nformat = \"Json\"").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[rstest]
    #[case("[logging]\nlevel = \"loud\"")]
    #[case("[logging]\nformat = \"xml\"")]
    #[case("[sync]\nmax_alias_depth = 0")]
    #[case("[sync]\nprimitives_collection = \"  \"")]
    fn test_invalid_values_are_rejected(#[case] content: &str) {
        let err = ConfigLoader::load_from_str(content).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ValidationError(_))), "got {:?}", err);
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let err = ConfigLoader::load_from_str("[sync]\nmax_depth = 3").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_blank_content_yields_defaults() {
        assert_eq!(ConfigLoader::load_from_str("  \n").unwrap(), CoreConfig::default());
    }
}
