//! General utilities for VarSync core.
//!
//! - [`string_utils`]: case conversions used for export-facing keys.
//! - [`paths`]: per-user directories and directory creation.

pub mod paths;
pub mod string_utils;

pub use string_utils::{to_camel_case, to_kebab_case};
