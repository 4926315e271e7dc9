//! HSL conversion used by hue inversion

use super::Color;
use crate::foundation::math::Vec3;

/// Hue, saturation, lightness, all in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue as a fraction of a full turn
    pub h: f32,
    /// Saturation
    pub s: f32,
    /// Lightness
    pub l: f32,
}

impl Hsl {
    /// Create an HSL triple
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Convert an RGB color to HSL
    pub fn from_color(color: Color) -> Self {
        let rgb = color.to_unit();
        let (r, g, b) = (rgb.x, rgb.y, rgb.z);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        // Exact integer compare so that grays are detected without epsilon
        if color.r == color.g && color.g == color.b {
            return Self::new(0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self::new(h / 6.0, s, l)
    }

    /// Convert back to 8-bit RGB
    pub fn to_color(self) -> Color {
        if self.s == 0.0 {
            return Color::from_unit(Vec3::new(self.l, self.l, self.l));
        }

        let q = if self.l < 0.5 {
            self.l * (1.0 + self.s)
        } else {
            self.l + self.s - self.l * self.s
        };
        let p = 2.0 * self.l - q;

        Color::from_unit(Vec3::new(
            hue_to_channel(p, q, self.h + 1.0 / 3.0),
            hue_to_channel(p, q, self.h),
            hue_to_channel(p, q, self.h - 1.0 / 3.0),
        ))
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
