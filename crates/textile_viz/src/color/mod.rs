//! # Color Model
//!
//! 8-bit RGB color values and the two derived colors every base color has:
//! the channel-wise complement and the hue-inverted color.
//!
//! Colors are immutable `Copy` values. All conversions that can see
//! out-of-range input clamp instead of failing; only hex parsing can fail.

mod hsl;

pub use hsl::Hsl;

use crate::foundation::math::{utils, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Color parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The string is not a `#RRGGBB` / `#RGB` hex color
    #[error("Invalid hex color: '{0}'")]
    InvalidHex(String),
}

/// 8-bit RGB color
///
/// Serializes as a `#RRGGBB` string so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Pure black
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// Pure white
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a color from 8-bit channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from unchecked integer channels, clamping each to 0..=255
    pub fn from_channels_clamped(r: i32, g: i32, b: i32) -> Self {
        let c = |v: i32| v.clamp(0, 255) as u8;
        Self::new(c(r), c(g), c(b))
    }

    /// Create a color from unit-range channels, clamping and rounding
    pub fn from_unit(rgb: Vec3) -> Self {
        let c = |v: f32| (utils::clamp(v, 0.0, 1.0) * 255.0).round() as u8;
        Self::new(c(rgb.x), c(rgb.y), c(rgb.z))
    }

    /// Channels in unit range
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `0xRRGGBB` or the short `#RGB` form
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(input.to_string()));
        }

        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
            _ => return Err(ColorError::InvalidHex(input.to_string())),
        };

        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|_| ColorError::InvalidHex(input.to_string()))?;
        Ok(Self::from_u32(value))
    }

    /// Create a color from a packed `0xRRGGBB` value (upper byte ignored)
    pub const fn from_u32(value: u32) -> Self {
        Self::new(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        )
    }

    /// Packed `0xRRGGBB` value
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Upper-case `#RRGGBB` string
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.to_u32())
    }

    /// Channel-wise inversion, `255 - channel`
    pub const fn complement(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Rotate the hue by half a turn, keeping saturation and lightness
    ///
    /// Grays have no hue, so they come back unchanged.
    pub fn hue_invert(self) -> Self {
        let hsl = Hsl::from_color(self);
        if hsl.s == 0.0 {
            return self;
        }
        Hsl::new((hsl.h + 0.5).rem_euclid(1.0), hsl.s, hsl.l).to_color()
    }

    /// Multiply every channel by `factor` (clamped into range)
    pub fn scale(self, factor: f32) -> Self {
        Self::from_unit(self.to_unit() * factor)
    }

    /// Linear blend toward `other`; `t = 0` is `self`, `t = 1` is `other`
    pub fn blend(self, other: Color, t: f32) -> Self {
        let t = utils::clamp(t, 0.0, 1.0);
        Self::from_unit(utils::lerp_vec3(&self.to_unit(), &other.to_unit(), t))
    }
}

/// Channel-wise complement of `c`
pub const fn complement_of(c: Color) -> Color {
    c.complement()
}

/// Hue inversion of `c`; a no-op for zero-saturation colors
pub fn hue_invert(c: Color) -> Color {
    c.hue_invert()
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.to_u32())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Base color plus its derived colors
///
/// The complement is recomputed on every base color change so it can never
/// go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorModel {
    base: Color,
    complementary: Color,
    lining_gray: Color,
}

impl ColorModel {
    /// Create a model with a base color and the fixed gray used for tonal linings
    pub fn new(base: Color, lining_gray: Color) -> Self {
        Self {
            base,
            complementary: base.complement(),
            lining_gray,
        }
    }

    /// Replace the base color and recompute the complement
    pub fn set_base_color(&mut self, color: Color) {
        self.base = color;
        self.complementary = color.complement();
        log::debug!("Base color set to {} (complement {})", self.base, self.complementary);
    }

    /// Current base color
    pub fn base(&self) -> Color {
        self.base
    }

    /// Complement of the current base color
    pub fn complementary(&self) -> Color {
        self.complementary
    }

    /// Hue-inverted base color
    pub fn hue_inverted(&self) -> Color {
        self.base.hue_invert()
    }

    /// Color used for the inner lining
    pub fn lining(&self, use_gray: bool) -> Color {
        if use_gray { self.lining_gray } else { self.complementary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Color, b: Color, tolerance: u8) {
        assert!(a.r.abs_diff(b.r) <= tolerance, "{a} vs {b}");
        assert!(a.g.abs_diff(b.g) <= tolerance, "{a} vs {b}");
        assert!(a.b.abs_diff(b.b) <= tolerance, "{a} vs {b}");
    }

    #[test]
    fn test_complement_of_ff5733() {
        let base = Color::from_hex("#FF5733").unwrap();
        assert_eq!(complement_of(base), Color::new(0x00, 0xA8, 0xCC));
        assert_eq!(complement_of(base).to_hex(), "#00A8CC");
    }

    #[test]
    fn test_complement_is_an_involution() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(15) {
                for b in [0u8, 1, 127, 128, 254, 255] {
                    let c = Color::new(r, g, b);
                    assert_eq!(complement_of(complement_of(c)), c);
                }
            }
        }
    }

    #[test]
    fn test_hue_invert_twice_returns_original() {
        for c in [
            Color::new(0xFF, 0x57, 0x33),
            Color::new(200, 50, 80),
            Color::new(10, 120, 30),
            Color::new(0, 0, 255),
        ] {
            assert_close(hue_invert(hue_invert(c)), c, 1);
        }
    }

    #[test]
    fn test_hue_invert_gray_is_noop() {
        for v in [0u8, 64, 128, 255] {
            let gray = Color::new(v, v, v);
            assert_eq!(hue_invert(gray), gray);
        }
    }

    #[test]
    fn test_hue_invert_differs_from_complement() {
        let c = Color::new(200, 50, 80);
        assert_ne!(hue_invert(c), complement_of(c));
        // Pure red rotates to cyan, same lightness
        assert_eq!(hue_invert(Color::new(255, 0, 0)), Color::new(0, 255, 255));
    }

    #[test]
    fn test_hex_parsing_forms() {
        assert_eq!(Color::from_hex("ff5733").unwrap(), Color::new(0xFF, 0x57, 0x33));
        assert_eq!(Color::from_hex("0xFF5733").unwrap(), Color::new(0xFF, 0x57, 0x33));
        assert_eq!(Color::from_hex("#fa3").unwrap(), Color::new(0xFF, 0xAA, 0x33));
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_out_of_range_channels_clamp() {
        assert_eq!(Color::from_channels_clamped(300, -20, 128), Color::new(255, 0, 128));
        assert_eq!(Color::from_unit(Vec3::new(1.5, -0.2, 0.5)), Color::new(255, 0, 128));
    }

    #[test]
    fn test_scale_and_blend() {
        let c = Color::new(201, 102, 53);
        assert_eq!(c.scale(0.3), Color::new(60, 31, 16));
        assert_eq!(c.blend(Color::WHITE, 0.7), Color::new(239, 209, 194));
        assert_eq!(c.blend(Color::BLACK, 0.0), c);
    }

    #[test]
    fn test_color_model_tracks_complement() {
        let mut model = ColorModel::new(Color::new(0xFF, 0x57, 0x33), Color::new(128, 128, 128));
        assert_eq!(model.complementary(), Color::new(0x00, 0xA8, 0xCC));

        model.set_base_color(Color::new(10, 20, 30));
        assert_eq!(model.complementary(), Color::new(245, 235, 225));
        assert_eq!(model.lining(false), Color::new(245, 235, 225));
        assert_eq!(model.lining(true), Color::new(128, 128, 128));
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let c = Color::new(0x12, 0xAB, 0xEF);
        let text = ron::to_string(&c).unwrap();
        assert_eq!(text, "\"#12ABEF\"");
        let back: Color = ron::from_str(&text).unwrap();
        assert_eq!(back, c);
    }
}
