//! Default configuration values.
//!
//! Used by `serde`'s `default` attribute on the configuration structs.

use super::types::{LoggingConfig, SyncConfig};
use std::path::PathBuf;

pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(super) fn default_log_format() -> String {
    "text".to_string()
}

pub(super) fn default_sync_config() -> SyncConfig {
    SyncConfig {
        max_alias_depth: default_max_alias_depth(),
        primitives_collection: default_primitives_collection(),
        primitive_mode_name: default_primitive_mode_name(),
        default_mode_name: default_mode_name(),
        system_theme_id: default_system_theme_id(),
    }
}

/// Alias chains in practice are two or three hops deep.
pub(super) fn default_max_alias_depth() -> u8 {
    10
}

pub(super) fn default_primitives_collection() -> String {
    "Primitives".to_string()
}

pub(super) fn default_primitive_mode_name() -> String {
    "Value".to_string()
}

pub(super) fn default_mode_name() -> String {
    "Mode 1".to_string()
}

pub(super) fn default_system_theme_id() -> String {
    "default".to_string()
}
