//! Theme and breakpoint descriptors and the mode names they require.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use varsync_core::Color;

use crate::model::{Literal, VariableType};
use crate::sync::types::{DesiredToken, DesiredValue};

/// Palette name of the system theme in the primitives collection.
pub const SYSTEM_PALETTE: &str = "brand";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDescriptor {
    pub id: String,
    pub brand_color: Color,
    #[serde(default = "default_true")]
    pub has_light_mode: bool,
    #[serde(default = "default_true")]
    pub has_dark_mode: bool,
    #[serde(default)]
    pub is_system: bool,
}

impl ThemeDescriptor {
    /// A theme with both light and dark modes.
    pub fn new(id: impl Into<String>, brand_color: Color) -> Self {
        Self {
            id: id.into(),
            brand_color,
            has_light_mode: true,
            has_dark_mode: true,
            is_system: false,
        }
    }

    pub fn light_only(mut self) -> Self {
        self.has_dark_mode = false;
        self
    }

    pub fn dark_only(mut self) -> Self {
        self.has_light_mode = false;
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }
}

/// Index of the system theme: the first flagged `is_system`, else the first
/// whose id equals `system_theme_id`.
pub fn system_theme_index(themes: &[ThemeDescriptor], system_theme_id: &str) -> Option<usize> {
    themes
        .iter()
        .position(|t| t.is_system)
        .or_else(|| themes.iter().position(|t| t.id == system_theme_id))
}

/// Primitive palette backing `theme`.
pub fn palette_name(theme: &ThemeDescriptor, is_system: bool) -> String {
    if is_system {
        SYSTEM_PALETTE.to_string()
    } else {
        theme.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

/// One mode derived from a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMode {
    pub name: String,
    pub theme_id: String,
    pub palette: String,
    pub scheme: ColorScheme,
}

/// Expands themes into their light/dark modes.
///
/// The system theme yields `light`/`dark`, every other theme
/// `{id}-light`/`{id}-dark`. System modes come first, the rest follow in
/// input order, and a name already produced is not repeated.
pub fn expand_theme_modes(themes: &[ThemeDescriptor], system_theme_id: &str) -> Vec<ThemeMode> {
    let system = system_theme_index(themes, system_theme_id);
    let ordered = system
        .into_iter()
        .chain((0..themes.len()).filter(|i| Some(*i) != system));

    let mut seen = HashSet::new();
    let mut modes = Vec::new();
    for index in ordered {
        let theme = &themes[index];
        let is_system = Some(index) == system;
        let schemes = [
            (theme.has_light_mode, ColorScheme::Light),
            (theme.has_dark_mode, ColorScheme::Dark),
        ];
        for (enabled, scheme) in schemes {
            if !enabled {
                continue;
            }
            let name = if is_system {
                scheme.as_str().to_string()
            } else {
                format!("{}-{}", theme.id, scheme.as_str())
            };
            if seen.insert(name.clone()) {
                modes.push(ThemeMode {
                    name,
                    theme_id: theme.id.clone(),
                    palette: palette_name(theme, is_system),
                    scheme,
                });
            }
        }
    }
    modes
}

pub fn theme_mode_names(themes: &[ThemeDescriptor], system_theme_id: &str) -> Vec<String> {
    expand_theme_modes(themes, system_theme_id)
        .into_iter()
        .map(|m| m.name)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointDescriptor {
    pub name: String,
    pub label: String,
    pub min_width: u32,
    pub scale: f64,
}

impl BreakpointDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, min_width: u32, scale: f64) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            min_width,
            scale,
        }
    }

    /// `base * scale`, rounded to two decimals.
    pub fn scale_value(&self, base: f64) -> f64 {
        (base * self.scale * 100.0).round() / 100.0
    }
}

/// Breakpoints in ascending `min_width`, ties kept in input order.
pub fn ordered_breakpoints(breakpoints: &[BreakpointDescriptor]) -> Vec<&BreakpointDescriptor> {
    let mut ordered: Vec<&BreakpointDescriptor> = breakpoints.iter().collect();
    ordered.sort_by_key(|b| b.min_width);
    ordered
}

pub fn breakpoint_mode_names(breakpoints: &[BreakpointDescriptor]) -> Vec<String> {
    let mut seen = HashSet::new();
    ordered_breakpoints(breakpoints)
        .into_iter()
        .filter(|b| seen.insert(b.name.clone()))
        .map(|b| b.name.clone())
        .collect()
}

/// A number token holding `base` scaled for each breakpoint mode.
pub fn responsive_token(name: &str, base: f64, breakpoints: &[BreakpointDescriptor]) -> DesiredToken {
    ordered_breakpoints(breakpoints)
        .into_iter()
        .fold(DesiredToken::new(name, VariableType::Number), |token, bp| {
            token.with_value(bp.name.clone(), DesiredValue::literal(Literal::Number(bp.scale_value(base))))
        })
}

/// The full set of modes a collection must expose.
#[derive(Debug, Clone, Default)]
pub struct ModeMatrix {
    themes: Vec<ThemeDescriptor>,
    breakpoints: Vec<BreakpointDescriptor>,
    system_theme_id: String,
}

impl ModeMatrix {
    pub fn new(system_theme_id: impl Into<String>) -> Self {
        Self {
            system_theme_id: system_theme_id.into(),
            ..Self::default()
        }
    }

    pub fn with_themes(mut self, themes: Vec<ThemeDescriptor>) -> Self {
        self.themes = themes;
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: Vec<BreakpointDescriptor>) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Theme modes, breakpoint modes, or `{theme}-{breakpoint}` for both, in
    /// theme-major order.
    pub fn mode_names(&self) -> Vec<String> {
        let themes = theme_mode_names(&self.themes, &self.system_theme_id);
        let breakpoints = breakpoint_mode_names(&self.breakpoints);
        match (themes.is_empty(), breakpoints.is_empty()) {
            (false, false) => themes
                .iter()
                .flat_map(|t| breakpoints.iter().map(move |b| format!("{}-{}", t, b)))
                .collect(),
            (false, true) => themes,
            (true, false) => breakpoints,
            (true, true) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn forest() -> ThemeDescriptor {
        ThemeDescriptor::new("forest", Color::from_rgb8(34, 139, 34)).light_only()
    }

    #[test]
    fn test_theme_expansion_system_first() {
        let themes = vec![ThemeDescriptor::new("default", Color::from_rgb8(51, 102, 255)).system(), forest()];
        assert_eq!(theme_mode_names(&themes, "default"), vec!["light", "dark", "forest-light"]);
    }

    #[test]
    fn test_theme_expansion_moves_system_theme_ahead() {
        let themes = vec![
            forest(),
            ThemeDescriptor::new("ocean", Color::from_rgb8(0, 105, 148)).dark_only(),
            ThemeDescriptor::new("default", Color::from_rgb8(51, 102, 255)),
        ];
        assert_eq!(
            theme_mode_names(&themes, "default"),
            vec!["light", "dark", "forest-light", "ocean-dark"]
        );
    }

    #[test]
    fn test_theme_modes_carry_palette_and_scheme() {
        let themes = vec![ThemeDescriptor::new("default", Color::WHITE), forest()];
        let modes = expand_theme_modes(&themes, "default");
        assert_eq!(modes[0].palette, "brand");
        assert_eq!(modes[1].scheme, ColorScheme::Dark);
        assert_eq!(modes[2].palette, "forest");
        assert_eq!(modes[2].theme_id, "forest");
    }

    #[test]
    fn test_theme_expansion_without_system_theme() {
        let themes = vec![forest()];
        assert_eq!(theme_mode_names(&themes, "default"), vec!["forest-light"]);
        assert!(theme_mode_names(&[], "default").is_empty());
    }

    #[test]
    fn test_duplicate_theme_ids_are_dropped() {
        let themes = vec![forest(), forest()];
        assert_eq!(theme_mode_names(&themes, "default"), vec!["forest-light"]);
    }

    fn breakpoints() -> Vec<BreakpointDescriptor> {
        vec![
            BreakpointDescriptor::new("desktop", "Desktop", 1024, 1.25),
            BreakpointDescriptor::new("mobile", "Mobile", 0, 1.0),
            BreakpointDescriptor::new("tablet", "Tablet", 768, 1.125),
        ]
    }

    #[test]
    fn test_breakpoints_ordered_by_min_width() {
        assert_eq!(breakpoint_mode_names(&breakpoints()), vec!["mobile", "tablet", "desktop"]);
    }

    #[test]
    fn test_scale_value_rounds_to_two_decimals() {
        let tablet = BreakpointDescriptor::new("tablet", "Tablet", 768, 1.125);
        assert_eq!(tablet.scale_value(15.0), 16.88);
        assert_eq!(tablet.scale_value(16.0), 18.0);
    }

    #[test]
    fn test_responsive_token_has_one_value_per_breakpoint() {
        let token = responsive_token("font/size/body", 16.0, &breakpoints());
        assert_eq!(token.variable_type, VariableType::Number);
        assert_eq!(token.per_mode.len(), 3);
        assert_eq!(token.per_mode["desktop"], DesiredValue::literal(Literal::Number(20.0)));
        assert_eq!(token.per_mode["mobile"], DesiredValue::literal(Literal::Number(16.0)));
    }

    #[test]
    fn test_combined_matrix_is_theme_major() {
        let matrix = ModeMatrix::new("default")
            .with_themes(vec![ThemeDescriptor::new("default", Color::WHITE)])
            .with_breakpoints(vec![
                BreakpointDescriptor::new("desktop", "Desktop", 1024, 1.25),
                BreakpointDescriptor::new("mobile", "Mobile", 0, 1.0),
            ]);
        assert_eq!(
            matrix.mode_names(),
            vec!["light-mobile", "light-desktop", "dark-mobile", "dark-desktop"]
        );
        assert!(ModeMatrix::new("default").mode_names().is_empty());
    }
}
