//! Configuration management for VarSync.
//!
//! - [`types`]: the configuration schema ([`CoreConfig`], [`LoggingConfig`], [`SyncConfig`]).
//! - [`defaults`]: default values used when fields are missing.
//! - [`loader`]: [`ConfigLoader`], which reads, parses and validates `config.toml`.

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, LoggingConfig, SyncConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.sync.max_alias_depth, 10);
        assert_eq!(config.sync.primitive_mode_name, "Value");
        assert_eq!(config.sync.system_theme_id, "default");
    }

    #[test]
    fn test_core_config_deserialize_full_logging() {
        let toml_data = r#"
            [logging]
            level = "trace"
            file_path = "/var/log/varsync.log"
            format = "json"
        "#;
        let config: CoreConfig = toml::from_str(toml_data).expect("Failed to deserialize CoreConfig");

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.file_path, Some(PathBuf::from("/var/log/varsync.log")));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.sync, SyncConfig::default());
    }
}
