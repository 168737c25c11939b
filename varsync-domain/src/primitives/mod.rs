//! The primitive tier: flat palettes and numeric scales that semantic
//! tokens alias into.

pub mod color_scale;
pub mod mapping;

pub use color_scale::{ColorScale, BASE_STEP, SCALE_STEPS};
pub use mapping::{shifted_step, InteractionState, TokenMapping};

use varsync_core::Color;

use crate::model::{Literal, VariableType};
use crate::naming::{join_segments, STORE_SEPARATOR};
use crate::modes::matrix::{palette_name, system_theme_index, ThemeDescriptor};
use crate::sync::types::{DesiredToken, DesiredValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveStore {
    palettes: Vec<(String, ColorScale)>,
    scales: Vec<(String, Vec<(String, f64)>)>,
}

impl PrimitiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One palette per theme: `brand` for the system theme, the theme id
    /// otherwise.
    pub fn from_themes(themes: &[ThemeDescriptor], system_theme_id: &str) -> Self {
        let system = system_theme_index(themes, system_theme_id);
        let mut store = Self::new();
        for (index, theme) in themes.iter().enumerate() {
            store.add_palette(palette_name(theme, Some(index) == system), theme.brand_color);
        }
        store
    }

    /// Adds or replaces the palette `name` generated from `base`.
    pub fn add_palette(&mut self, name: impl Into<String>, base: Color) -> &ColorScale {
        let name = name.into();
        let scale = ColorScale::generate(base);
        let index = match self.palettes.iter().position(|(n, _)| *n == name) {
            Some(index) => {
                self.palettes[index].1 = scale;
                index
            }
            None => {
                self.palettes.push((name, scale));
                self.palettes.len() - 1
            }
        };
        &self.palettes[index].1
    }

    /// Adds or replaces a numeric scale.
    ///
    /// Keys become name segments, so a `.` in a key is written as `_`
    /// (`0.5` becomes `0_5`).
    pub fn add_scale<I, K>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let name = name.into();
        let values: Vec<(String, f64)> = values
            .into_iter()
            .map(|(k, v)| (k.into().replace('.', "_"), v))
            .collect();
        match self.scales.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = values,
            None => self.scales.push((name, values)),
        }
    }

    /// Copies every table of `other` into `self`, replacing same-named ones.
    pub fn merge(&mut self, other: &PrimitiveStore) {
        for (name, scale) in &other.palettes {
            match self.palettes.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = scale.clone(),
                None => self.palettes.push((name.clone(), scale.clone())),
            }
        }
        for (name, values) in &other.scales {
            match self.scales.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = values.clone(),
                None => self.scales.push((name.clone(), values.clone())),
            }
        }
    }

    pub fn palette(&self, name: &str) -> Option<&ColorScale> {
        self.palettes.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn scale(&self, name: &str) -> Option<&[(String, f64)]> {
        self.scales.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_slice())
    }

    pub fn palette_names(&self) -> impl Iterator<Item = &str> {
        self.palettes.iter().map(|(n, _)| n.as_str())
    }

    /// Looks up `palette/step` or `scale/key`.
    pub fn lookup(&self, name: &str) -> Option<Literal> {
        let (table, key) = name.split_once(STORE_SEPARATOR)?;
        if let Some(palette) = self.palette(table) {
            let step = key.parse::<u16>().ok()?;
            return palette.get(step).map(Literal::Color);
        }
        self.scale(table)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| Literal::Number(*v))
    }

    /// One token per primitive carrying the same literal in every mode of
    /// `mode_names`.
    pub fn desired_tokens(&self, mode_names: &[String]) -> Vec<DesiredToken> {
        let with_modes = |token: DesiredToken, literal: Literal| {
            mode_names.iter().fold(token, |token, mode| {
                token.with_value(mode.clone(), DesiredValue::literal(literal.clone()))
            })
        };

        let colors = self.palettes.iter().flat_map(|(name, scale)| {
            scale.iter().map(move |(step, color)| {
                with_modes(
                    DesiredToken::new(join_segments([name.clone(), step.to_string()]), VariableType::Color),
                    Literal::Color(color),
                )
            })
        });
        let numbers = self.scales.iter().flat_map(|(name, values)| {
            values.iter().map(move |(key, value)| {
                with_modes(
                    DesiredToken::new(join_segments([name.as_str(), key.as_str()]), VariableType::Number),
                    Literal::Number(*value),
                )
            })
        });
        colors.chain(numbers).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn themes() -> Vec<ThemeDescriptor> {
        vec![
            ThemeDescriptor::new("forest", Color::from_rgb8(34, 139, 34)),
            ThemeDescriptor::new("default", Color::from_rgb8(51, 102, 255)),
        ]
    }

    #[test]
    fn test_from_themes_names_palettes() {
        let store = PrimitiveStore::from_themes(&themes(), "default");
        assert_eq!(store.palette_names().collect::<Vec<_>>(), vec!["forest", "brand"]);
        assert_eq!(store.palette("brand").unwrap().base(), Color::from_rgb8(51, 102, 255));
    }

    #[test]
    fn test_lookup_palette_and_scale() {
        let mut store = PrimitiveStore::from_themes(&themes(), "default");
        store.add_scale("spacing", [("0.5", 2.0), ("4", 16.0)]);
        assert_eq!(store.lookup("brand/500"), Some(Literal::Color(Color::from_rgb8(51, 102, 255))));
        assert_eq!(store.lookup("spacing/0_5"), Some(Literal::Number(2.0)));
        assert_eq!(store.lookup("spacing/4"), Some(Literal::Number(16.0)));
        assert_eq!(store.lookup("brand/510"), None);
        assert_eq!(store.lookup("radius/4"), None);
        assert_eq!(store.lookup("brand"), None);
    }

    #[test]
    fn test_add_palette_replaces_existing() {
        let mut store = PrimitiveStore::new();
        store.add_palette("brand", Color::WHITE);
        let scale = store.add_palette("brand", Color::BLACK);
        assert_eq!(scale.base(), Color::BLACK);
        assert_eq!(store.palette_names().count(), 1);
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let mut store = PrimitiveStore::from_themes(&themes(), "default");
        let mut extra = PrimitiveStore::new();
        extra.add_palette("brand", Color::BLACK);
        extra.add_palette("red", Color::from_rgb8(220, 20, 60));
        extra.add_scale("radius", [("sm", 4.0)]);

        store.merge(&extra);
        assert_eq!(store.palette_names().collect::<Vec<_>>(), vec!["forest", "brand", "red"]);
        assert_eq!(store.palette("brand").unwrap().base(), Color::BLACK);
        assert_eq!(store.lookup("radius/sm"), Some(Literal::Number(4.0)));
    }

    #[test]
    fn test_desired_tokens_cover_every_primitive() {
        let mut store = PrimitiveStore::new();
        store.add_palette("brand", Color::from_rgb8(51, 102, 255));
        store.add_scale("radius", [("sm", 4.0)]);
        let modes = vec!["Value".to_string()];

        let tokens = store.desired_tokens(&modes);
        assert_eq!(tokens.len(), SCALE_STEPS.len() + 1);
        assert_eq!(tokens[0].name, "brand/25");
        assert_eq!(tokens[19].name, "brand/500");
        assert_eq!(
            tokens[19].per_mode["Value"],
            DesiredValue::literal(Literal::Color(Color::from_rgb8(51, 102, 255)))
        );
        let radius = tokens.last().unwrap();
        assert_eq!(radius.name, "radius/sm");
        assert_eq!(radius.variable_type, VariableType::Number);
    }
}
