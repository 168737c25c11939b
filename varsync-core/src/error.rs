//! Error handling for the VarSync core layer.
//!
//! This module defines the error types shared by every VarSync crate. They are
//! built with the `thiserror` crate so that each variant carries a readable
//! message and, where applicable, its underlying source error.
//!
//! The main error type is [`CoreError`], which wraps the more specific
//! [`ConfigError`] for configuration failures.
//!
//! # Examples
//!
//! ```rust,ignore
//! use varsync_core::error::CoreError;
//!
//! fn check_name(name: &str) -> Result<(), CoreError> {
//!     if name.is_empty() {
//!         return Err(CoreError::InvalidInput("name must not be empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for VarSync.
///
/// Represents every failure that can occur in the core layer: configuration
/// loading, logging setup, filesystem access and invalid input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while installing the global tracing subscriber.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(String),

    /// Filesystem operations such as creating a log directory.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The per-user configuration directory could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}
