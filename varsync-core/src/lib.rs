//! # VarSync Core Library (`varsync-core`)
//!
//! Foundational infrastructure shared by the VarSync crates:
//!
//! - **Error Handling**: [`CoreError`] and [`ConfigError`].
//! - **Configuration**: TOML-based [`CoreConfig`] loaded and validated by [`ConfigLoader`],
//!   including the [`SyncConfig`] knobs of the synchronization engine.
//! - **Logging**: `tracing` subscribers configured from [`LoggingConfig`].
//! - **Types**: the RGBA [`Color`] payload of color variables.
//! - **Utilities**: case conversions and per-user paths.
//!
//! ```rust,ignore
//! use varsync_core::config::ConfigLoader;
//! use varsync_core::logging::init_logging;
//! use varsync_core::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("VarSync core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig, SyncConfig};
pub use error::{ConfigError, CoreError};
pub use logging::{init_logging, init_minimal_logging};
pub use types::{Color, ColorParseError};
