//! Mode matrix construction.
//!
//! [`matrix`] derives the mode names a collection needs from theme and
//! breakpoint descriptors; [`builder`] reconciles them with the store.

pub mod builder;
pub mod matrix;

pub use builder::{ModeMatrixBuilder, ModeReconciliation};
pub use matrix::{
    breakpoint_mode_names, expand_theme_modes, responsive_token, theme_mode_names, BreakpointDescriptor,
    ColorScheme, ModeMatrix, ThemeDescriptor, ThemeMode,
};
