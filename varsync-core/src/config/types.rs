//! Configuration data structures for VarSync.
//!
//! These structs are populated by deserializing `config.toml`. Missing fields
//! fall back to the functions in [`super::defaults`], and unknown fields are
//! rejected via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use varsync_core::config::LoggingConfig;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. File logging is disabled when `None`.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Tuning of the synchronization engine.
///
/// # Examples
///
/// ```
/// use varsync_core::config::SyncConfig;
///
/// let sync: SyncConfig = toml::from_str("max_alias_depth = 4").unwrap();
/// assert_eq!(sync.max_alias_depth, 4);
/// assert_eq!(sync.primitives_collection, "Primitives");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Maximum number of alias hops the resolver follows.
    #[serde(default = "defaults::default_max_alias_depth")]
    pub max_alias_depth: u8,
    /// Name of the collection holding raw primitive values.
    #[serde(default = "defaults::default_primitives_collection")]
    pub primitives_collection: String,
    /// Single mode name used by the primitives collection.
    #[serde(default = "defaults::default_primitive_mode_name")]
    pub primitive_mode_name: String,
    /// Name the store gives the sole mode of a freshly created collection.
    #[serde(default = "defaults::default_mode_name")]
    pub default_mode_name: String,
    /// Theme id treated as the system theme when no descriptor is flagged.
    #[serde(default = "defaults::default_system_theme_id")]
    pub system_theme_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        defaults::default_sync_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use varsync_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [sync]
/// default_mode_name = "Value"
/// "#;
/// let config: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(config.logging.level, "warn");
/// assert_eq!(config.sync.default_mode_name, "Value");
/// assert_eq!(config.sync.max_alias_depth, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_sync_config")]
    pub sync: SyncConfig,
}
