//! Core data types shared across VarSync crates.

pub mod color;

pub use color::{Color, ColorParseError};
