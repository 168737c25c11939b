//! RGBA color values.
//!
//! [`Color`] is the payload of every color variable. Channels are `f32` in
//! `[0.0, 1.0]`. Colors serialize as `#rrggbbaa` hex strings.
//!
//! ```
//! use varsync_core::types::Color;
//!
//! let brand = Color::from_hex("#3366ff").unwrap();
//! assert_eq!(brand.to_rgb8(), (0x33, 0x66, 0xff));
//! assert_eq!(brand.to_hex_with_alpha(), "#3366ffff");
//! ```

use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Invalid hex color string format: '{0}'. Expected #RGB, #RGBA, #RRGGBB, or #RRGGBBAA.")]
    InvalidHexFormat(String),

    #[error("Invalid hex digit in '{input_str}': {source}")]
    InvalidHexDigit {
        input_str: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid hex color string length: '{0}'. Expected 3, 4, 6, or 8 characters after '#'.")]
    InvalidHexLength(String),

    #[error("Invalid color string format: {0}")]
    InvalidFormat(String),
}

/// A color in RGBA format with channels in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// Creates a color, clamping every component into `[0.0, 1.0]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Creates an opaque color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::new(r, g, b, 1.0)
    }

    /// Creates an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Creates a color from 8-bit channels including alpha.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (case-insensitive).
    pub fn from_hex(hex_str: &str) -> Result<Self, ColorParseError> {
        let input = hex_str
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::InvalidHexFormat(hex_str.to_string()))?;
        if !input.is_ascii() {
            return Err(ColorParseError::InvalidHexFormat(hex_str.to_string()));
        }

        let parse = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|e| ColorParseError::InvalidHexDigit {
                input_str: s.to_string(),
                source: e,
            })
        };
        // Short forms repeat each digit: "f" -> "ff".
        let short = |s: &str| parse(s).map(|v| (v << 4) | v);

        match input.len() {
            3 => Ok(Color::from_rgb8(short(&input[0..1])?, short(&input[1..2])?, short(&input[2..3])?)),
            4 => Ok(Color::from_rgba8(
                short(&input[0..1])?,
                short(&input[1..2])?,
                short(&input[2..3])?,
                short(&input[3..4])?,
            )),
            6 => Ok(Color::from_rgb8(parse(&input[0..2])?, parse(&input[2..4])?, parse(&input[4..6])?)),
            8 => Ok(Color::from_rgba8(
                parse(&input[0..2])?,
                parse(&input[2..4])?,
                parse(&input[4..6])?,
                parse(&input[6..8])?,
            )),
            _ => Err(ColorParseError::InvalidHexLength(hex_str.to_string())),
        }
    }

    /// RGB channels as 8-bit values, each rounded to the nearest integer.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b))
    }

    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        let (r, g, b) = self.to_rgb8();
        (r, g, b, channel_to_u8(self.a))
    }

    /// `#rrggbb`, alpha ignored.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// `#rrggbbaa`.
    pub fn to_hex_with_alpha(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }

    /// HSL lightness in `[0.0, 1.0]`: the mean of the largest and smallest channel.
    pub fn lightness(&self) -> f32 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        (max + min) / 2.0
    }

    /// Mixes `self` over `background` with weight `alpha` in 8-bit space.
    ///
    /// Each channel is `fg * alpha + bg * (1 - alpha)` rounded to the nearest
    /// integer in `[0, 255]`. The result is opaque.
    pub fn mix_over(&self, background: &Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        let channel = |fg: f32, bg: f32| {
            let value = (fg * 255.0) * alpha + (bg * 255.0) * (1.0 - alpha);
            value.round().clamp(0.0, 255.0) as u8
        };
        Color::from_rgb8(
            channel(self.r, background.r),
            channel(self.g, background.g),
            channel(self.b, background.b),
        )
    }

    /// Opaque copy of this color.
    #[must_use]
    pub fn opaque(self) -> Color {
        Color { a: 1.0, ..self }
    }
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex_with_alpha())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_str(&s).map_err(SerdeError::custom)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parses hex (`#...`), `rgb(r, g, b)` or `rgba(r, g, b, a)` strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Color::from_hex(s);
        }

        let (content, expected) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')'), 4)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest.strip_suffix(')'), 3)
        } else {
            return Err(ColorParseError::InvalidFormat(format!("Unsupported color format: {}", s)));
        };
        let content = content.ok_or_else(|| ColorParseError::InvalidFormat(format!("Missing ')' in '{}'", s)))?;

        let parts: Vec<&str> = content.split(',').map(str::trim).collect();
        if parts.len() != expected {
            return Err(ColorParseError::InvalidFormat(format!(
                "Expected {} components in '{}', found {}",
                expected,
                s,
                parts.len()
            )));
        }

        let component = |idx: usize, label: &str| {
            parts[idx]
                .parse::<u8>()
                .map_err(|e| ColorParseError::InvalidFormat(format!("Invalid {} component in '{}': {}", label, s, e)))
        };
        let r = component(0, "red")?;
        let g = component(1, "green")?;
        let b = component(2, "blue")?;
        let a = if expected == 4 {
            parts[3]
                .parse::<f32>()
                .map_err(|e| ColorParseError::InvalidFormat(format!("Invalid alpha component in '{}': {}", s, e)))?
        } else {
            1.0
        };
        if !a.is_finite() {
            return Err(ColorParseError::InvalidFormat(format!("Alpha component in '{}' is not finite", s)));
        }

        Ok(Color::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}", self.to_hex_with_alpha())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#f00", (255, 0, 0, 255))]
    #[case("#F008", (255, 0, 0, 136))]
    #[case("#3366ff", (0x33, 0x66, 0xff, 255))]
    #[case("#3366ff80", (0x33, 0x66, 0xff, 0x80))]
    fn test_from_hex_forms(#[case] input: &str, #[case] expected: (u8, u8, u8, u8)) {
        assert_eq!(Color::from_hex(input).unwrap().to_rgba8(), expected);
    }

    #[test]
    fn test_from_hex_errors() {
        assert!(matches!(Color::from_hex("3366ff"), Err(ColorParseError::InvalidHexFormat(_))));
        assert!(matches!(Color::from_hex("#3366f"), Err(ColorParseError::InvalidHexLength(_))));
        assert!(matches!(Color::from_hex("#zz66ff"), Err(ColorParseError::InvalidHexDigit { .. })));
    }

    #[test]
    fn test_from_str_rgb_and_rgba() {
        assert_eq!(Color::from_str("rgb(255, 0, 0)").unwrap(), Color::rgb(1.0, 0.0, 0.0));
        let c = Color::from_str("rgba(0, 0, 255, 0.5)").unwrap();
        assert_eq!(c.to_rgb8(), (0, 0, 255));
        assert_eq!(c.a, 0.5);
        assert!(Color::from_str("rgb(1, 2)").is_err());
        assert!(Color::from_str("hsl(0, 0%, 0%)").is_err());
    }

    #[rstest]
    #[case("rgba(0, 0, 255, NaN)")]
    #[case("rgba(0, 0, 255, inf)")]
    #[case("rgba(0, 0, 255, -inf)")]
    fn test_from_str_rejects_non_finite_alpha(#[case] input: &str) {
        assert!(matches!(Color::from_str(input), Err(ColorParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_mix_over_endpoints() {
        let base = Color::from_rgb8(51, 102, 255);
        assert_eq!(base.mix_over(&Color::WHITE, 1.0), base);
        assert_eq!(base.mix_over(&Color::WHITE, 0.0), Color::WHITE);
        assert_eq!(base.mix_over(&Color::BLACK, 0.0), Color::BLACK);
    }

    #[test]
    fn test_mix_over_rounds_each_channel() {
        // 51 * 0.5 + 255 * 0.5 = 153
        let mixed = Color::from_rgb8(51, 101, 255).mix_over(&Color::WHITE, 0.5);
        assert_eq!(mixed.to_rgb8(), (153, 178, 255));
    }

    #[test]
    fn test_serde_round_trip_uses_hex() {
        let color = Color::from_rgba8(1, 2, 3, 4);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_rgba8(), (1, 2, 3, 4));
    }

    #[test]
    fn test_lightness() {
        assert_eq!(Color::WHITE.lightness(), 1.0);
        assert_eq!(Color::BLACK.lightness(), 0.0);
    }
}
