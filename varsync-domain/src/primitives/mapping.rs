//! Declarative rules mapping semantic tokens onto palette steps.

use serde::{Deserialize, Serialize};

use crate::model::VariableType;
use crate::modes::{ColorScheme, ThemeMode};
use crate::naming::{dedupe_segments, join_segments, reference_to};
use crate::sync::types::{DesiredToken, DesiredValue};

const MIN_STEP: i32 = 25;
const MAX_STEP: i32 = 975;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    #[default]
    Default,
    Hover,
    Pressed,
    Focus,
    Disabled,
}

impl InteractionState {
    /// Step offset toward more emphasis. Negative values move toward the
    /// background.
    pub fn step_shift(self) -> i32 {
        match self {
            InteractionState::Default => 0,
            InteractionState::Hover => 100,
            InteractionState::Pressed => 200,
            InteractionState::Focus => 100,
            InteractionState::Disabled => -300,
        }
    }

    pub fn suffix(self) -> Option<&'static str> {
        match self {
            InteractionState::Default => None,
            InteractionState::Hover => Some("hover"),
            InteractionState::Pressed => Some("pressed"),
            InteractionState::Focus => Some("focus"),
            InteractionState::Disabled => Some("disabled"),
        }
    }
}

/// The palette step to use for `base_step` in `state` under `scheme`.
///
/// Dark schemes mirror the step (`1000 - step`) and shift toward lighter
/// swatches. The result is clamped to 25..=975 on the 25-step grid.
pub fn shifted_step(base_step: u16, state: InteractionState, scheme: ColorScheme) -> u16 {
    let base = i32::from(base_step);
    let shift = state.step_shift();
    let step = match scheme {
        ColorScheme::Light => base + shift,
        ColorScheme::Dark => (1000 - base) - shift,
    };
    let snapped = ((f64::from(step) / 25.0).round() as i32) * 25;
    snapped.clamp(MIN_STEP, MAX_STEP) as u16
}

/// Maps `category/subcategory[-state]` to a palette step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMapping {
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub state: InteractionState,
    /// Fixed palette. When absent each theme mode uses its own palette.
    #[serde(default)]
    pub palette: Option<String>,
    pub step: u16,
    #[serde(default)]
    pub description: Option<String>,
}

impl TokenMapping {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>, step: u16) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            state: InteractionState::Default,
            palette: None,
            step,
            description: None,
        }
    }

    pub fn with_state(mut self, state: InteractionState) -> Self {
        self.state = state;
        self
    }

    pub fn with_palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn token_name(&self) -> String {
        let leaf = match self.state.suffix() {
            Some(suffix) => format!("{}-{}", self.subcategory, suffix),
            None => self.subcategory.clone(),
        };
        dedupe_segments(&join_segments([self.category.as_str(), leaf.as_str()]))
    }

    /// A colour token with one `{palette.step}` reference per theme mode.
    pub fn desired_token(&self, theme_modes: &[ThemeMode]) -> DesiredToken {
        let mut token = DesiredToken::new(self.token_name(), VariableType::Color);
        token.description = self.description.clone();
        for mode in theme_modes {
            let palette = self.palette.as_deref().unwrap_or(&mode.palette);
            let step = shifted_step(self.step, self.state, mode.scheme);
            let target = join_segments([palette, step.to_string().as_str()]);
            token = token.with_value(mode.name.clone(), DesiredValue::reference(reference_to(&target)));
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::expand_theme_modes;
    use crate::modes::ThemeDescriptor;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use varsync_core::Color;

    #[rstest]
    #[case(500, InteractionState::Default, ColorScheme::Light, 500)]
    #[case(500, InteractionState::Hover, ColorScheme::Light, 600)]
    #[case(500, InteractionState::Pressed, ColorScheme::Light, 700)]
    #[case(500, InteractionState::Disabled, ColorScheme::Light, 200)]
    #[case(500, InteractionState::Hover, ColorScheme::Dark, 400)]
    #[case(100, InteractionState::Default, ColorScheme::Dark, 900)]
    #[case(900, InteractionState::Pressed, ColorScheme::Light, 975)]
    #[case(50, InteractionState::Disabled, ColorScheme::Light, 25)]
    #[case(510, InteractionState::Default, ColorScheme::Light, 500)]
    fn test_shifted_step(
        #[case] base: u16,
        #[case] state: InteractionState,
        #[case] scheme: ColorScheme,
        #[case] expected: u16,
    ) {
        assert_eq!(shifted_step(base, state, scheme), expected);
    }

    #[test]
    fn test_token_name_appends_state_and_dedupes() {
        assert_eq!(TokenMapping::new("bg", "page", 50).token_name(), "bg/page");
        assert_eq!(
            TokenMapping::new("button", "primary", 500)
                .with_state(InteractionState::Hover)
                .token_name(),
            "button/primary-hover"
        );
        assert_eq!(
            TokenMapping::new("primary", "primary", 500)
                .with_state(InteractionState::Hover)
                .token_name(),
            "primary-hover"
        );
    }

    #[test]
    fn test_desired_token_references_each_theme_palette() {
        let themes = vec![
            ThemeDescriptor::new("default", Color::from_rgb8(51, 102, 255)),
            ThemeDescriptor::new("forest", Color::from_rgb8(34, 139, 34)).light_only(),
        ];
        let modes = expand_theme_modes(&themes, "default");
        let token = TokenMapping::new("bg", "brand", 500)
            .with_state(InteractionState::Hover)
            .with_description("Brand surface on hover")
            .desired_token(&modes);

        assert_eq!(token.name, "bg/brand-hover");
        assert_eq!(token.variable_type, VariableType::Color);
        assert_eq!(token.description.as_deref(), Some("Brand surface on hover"));
        assert_eq!(token.per_mode["light"], DesiredValue::reference("{brand.600}"));
        assert_eq!(token.per_mode["dark"], DesiredValue::reference("{brand.400}"));
        assert_eq!(token.per_mode["forest-light"], DesiredValue::reference("{forest.600}"));
    }

    #[test]
    fn test_fixed_palette_overrides_theme_palette() {
        let modes = expand_theme_modes(&[ThemeDescriptor::new("default", Color::WHITE)], "default");
        let token = TokenMapping::new("text", "danger", 600).with_palette("red").desired_token(&modes);
        assert_eq!(token.per_mode["light"], DesiredValue::reference("{red.600}"));
        assert_eq!(token.per_mode["dark"], DesiredValue::reference("{red.400}"));
    }

    #[test]
    fn test_mapping_deserializes_with_defaults() {
        let mapping: TokenMapping =
            serde_json::from_str(r#"{"category": "border", "subcategory": "focus", "step": 500}"#).unwrap();
        assert_eq!(mapping.state, InteractionState::Default);
        assert_eq!(mapping.palette, None);
    }
}
