//! # Gradient / Material Generator
//!
//! Turns a color plus a few render options into a material descriptor the
//! substrate can apply to a surface. Every non-wireframe surface carries the
//! same vertical ramp: black at the bottom, the color at mid-height and white
//! at the top. An optional angular blend is layered on top of that ramp.

use crate::color::Color;
use crate::foundation::math::{constants, utils, Vec3};
use serde::{Deserialize, Serialize};

/// Upper bound of the angular blend weight; the circular contribution never
/// fully replaces the vertical ramp.
pub const CIRCULAR_BLEND_CAP: f32 = 0.5;

/// One stop of a vertical gradient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Parametric height in [0, 1]
    pub position: f32,
    /// Stop color
    pub color: Color,
}

/// Angular blend layered over the vertical ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularBlend {
    /// Color blended in away from the seam
    pub secondary: Color,
    /// Weight reached at the side opposite the seam
    pub max_weight: f32,
}

/// Vertical 3-stop gradient with uniform opacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientDescriptor {
    /// Black at 0.0, base color at 0.5, white at 1.0
    pub stops: [GradientStop; 3],
    /// Uniform opacity in [0, 1]
    pub opacity: f32,
    /// Whether the surface needs alpha blending
    pub transparent: bool,
    /// Optional angular blend
    pub circular: Option<CircularBlend>,
}

impl GradientDescriptor {
    /// The color at the middle stop
    pub fn base_color(&self) -> Color {
        self.stops[1].color
    }

    /// Vertical ramp color at parametric height `t`, linear per half
    pub fn vertical_color(&self, t: f32) -> Vec3 {
        let t = utils::clamp(t, 0.0, 1.0);
        let [bottom, middle, top] = &self.stops;
        if t <= middle.position {
            let span = middle.position - bottom.position;
            utils::lerp_vec3(&bottom.color.to_unit(), &middle.color.to_unit(), (t - bottom.position) / span)
        } else {
            let span = top.position - middle.position;
            utils::lerp_vec3(&middle.color.to_unit(), &top.color.to_unit(), (t - middle.position) / span)
        }
    }

    /// Final surface color at height `t` and angle `angle` (radians around the axis)
    pub fn sample(&self, t: f32, angle: f32) -> Vec3 {
        let vertical = self.vertical_color(t);
        match &self.circular {
            Some(blend) => {
                let weight = angle_weight(angle) * blend.max_weight;
                utils::lerp_vec3(&vertical, &blend.secondary.to_unit(), weight)
            }
            None => vertical,
        }
    }

    /// Same as [`sample`](Self::sample) but addressed in surface UV space
    pub fn sample_uv(&self, u: f32, v: f32) -> Vec3 {
        let vertical = self.vertical_color(v);
        match &self.circular {
            Some(blend) => {
                let weight = uv_angle_weight(u, v) * blend.max_weight;
                utils::lerp_vec3(&vertical, &blend.secondary.to_unit(), weight)
            }
            None => vertical,
        }
    }
}

/// Normalized angular weight: 0 at the seam (angle 0), 1 on the opposite side
pub fn angle_weight(angle: f32) -> f32 {
    let wrapped = utils::wrap_angle(angle);
    let from_seam = if wrapped > constants::PI { constants::TAU - wrapped } else { wrapped };
    from_seam / constants::PI
}

/// Angular weight computed from UV coordinates
///
/// The angle is taken as `atan2(u - 0.5, v - 0.5)`, i.e. with the U offset in
/// the numerator. The seam therefore lies along +V from the UV center.
pub fn uv_angle_weight(u: f32, v: f32) -> f32 {
    (u - 0.5).atan2(v - 0.5).abs() / constants::PI
}

/// Options for [`build_gradient`] and [`build_material`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientOptions {
    /// Alpha-blended surface
    pub transparent: bool,
    /// Requested opacity, clamped to [0, 1]; ignored unless `transparent`
    pub opacity: f32,
    /// Flat wireframe tint instead of the ramp
    pub wireframe: bool,
    /// Layer the angular blend
    pub circular: bool,
    /// Secondary color for the angular blend; the base color when absent
    pub circular_secondary: Option<Color>,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            transparent: false,
            opacity: 1.0,
            wireframe: false,
            circular: false,
            circular_secondary: None,
        }
    }
}

/// Build the vertical ramp for `color`
///
/// The ramp is produced regardless of `opts.wireframe`; use
/// [`build_material`] to get the wireframe variant.
pub fn build_gradient(color: Color, opts: &GradientOptions) -> GradientDescriptor {
    let opacity = if opts.transparent { utils::clamp(opts.opacity, 0.0, 1.0) } else { 1.0 };
    let circular = opts.circular.then(|| CircularBlend {
        // No secondary degenerates to no visible angular effect
        secondary: opts.circular_secondary.unwrap_or(color),
        max_weight: CIRCULAR_BLEND_CAP,
    });

    GradientDescriptor {
        stops: [
            GradientStop { position: 0.0, color: Color::BLACK },
            GradientStop { position: 0.5, color },
            GradientStop { position: 1.0, color: Color::WHITE },
        ],
        opacity,
        transparent: opts.transparent,
        circular,
    }
}

/// Surface material, one variant per way the substrate has to draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialDescriptor {
    /// Vertical ramp (plus optional angular blend)
    Gradient(GradientDescriptor),
    /// Flat-tinted wireframe
    Wireframe {
        /// Line color
        color: Color,
        /// Line opacity
        opacity: f32,
    },
    /// Single flat color
    FlatColor {
        /// Surface color
        color: Color,
        /// Surface opacity
        opacity: f32,
    },
}

impl MaterialDescriptor {
    /// Flat wireframe tint
    pub fn wireframe(color: Color) -> Self {
        Self::Wireframe { color, opacity: 1.0 }
    }

    /// Opaque flat color
    pub fn flat(color: Color) -> Self {
        Self::FlatColor { color, opacity: 1.0 }
    }

    /// Uniform opacity of the material
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Gradient(gradient) => gradient.opacity,
            Self::Wireframe { opacity, .. } | Self::FlatColor { opacity, .. } => *opacity,
        }
    }

    /// Whether the substrate should alpha-blend this material
    pub fn is_transparent(&self) -> bool {
        match self {
            Self::Gradient(gradient) => gradient.transparent,
            Self::Wireframe { opacity, .. } | Self::FlatColor { opacity, .. } => *opacity < 1.0,
        }
    }

    /// Whether this is drawn as lines
    pub fn is_wireframe(&self) -> bool {
        matches!(self, Self::Wireframe { .. })
    }

    /// The single representative color (the ramp midpoint for gradients)
    pub fn primary_color(&self) -> Color {
        match self {
            Self::Gradient(gradient) => gradient.base_color(),
            Self::Wireframe { color, .. } | Self::FlatColor { color, .. } => *color,
        }
    }
}

/// Build the material for `color`: a flat wireframe tint when
/// `opts.wireframe`, the gradient ramp otherwise
pub fn build_material(color: Color, opts: &GradientOptions) -> MaterialDescriptor {
    if opts.wireframe {
        MaterialDescriptor::wireframe(color)
    } else {
        MaterialDescriptor::Gradient(build_gradient(color, opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BASE: Color = Color::new(0xFF, 0x57, 0x33);

    #[test]
    fn test_gradient_has_three_fixed_stops() {
        let gradient = build_gradient(BASE, &GradientOptions::default());
        assert_eq!(gradient.stops[0], GradientStop { position: 0.0, color: Color::BLACK });
        assert_eq!(gradient.stops[1], GradientStop { position: 0.5, color: BASE });
        assert_eq!(gradient.stops[2], GradientStop { position: 1.0, color: Color::WHITE });
        assert_eq!(gradient.opacity, 1.0);
        assert!(gradient.circular.is_none());
    }

    #[test]
    fn test_vertical_ramp_interpolates_per_half() {
        let gradient = build_gradient(Color::new(200, 100, 0), &GradientOptions::default());
        assert_relative_eq!(gradient.vertical_color(0.0), Vec3::zeros());
        assert_relative_eq!(gradient.vertical_color(0.5), Color::new(200, 100, 0).to_unit());
        assert_relative_eq!(gradient.vertical_color(1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(
            gradient.vertical_color(0.25),
            Color::new(200, 100, 0).to_unit() * 0.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_opacity_clamped_and_only_for_transparent() {
        let opts = GradientOptions { transparent: true, opacity: 1.7, ..Default::default() };
        assert_eq!(build_gradient(BASE, &opts).opacity, 1.0);

        let opts = GradientOptions { transparent: true, opacity: -0.2, ..Default::default() };
        assert_eq!(build_gradient(BASE, &opts).opacity, 0.0);

        let opts = GradientOptions { transparent: false, opacity: 0.3, ..Default::default() };
        assert_eq!(build_gradient(BASE, &opts).opacity, 1.0);
    }

    #[test]
    fn test_circular_blend_is_capped_at_half() {
        let secondary = Color::WHITE;
        let opts = GradientOptions {
            circular: true,
            circular_secondary: Some(secondary),
            ..Default::default()
        };
        let gradient = build_gradient(Color::BLACK, &opts);

        // Seam: no contribution
        assert_relative_eq!(gradient.sample(0.0, 0.0), Vec3::zeros());
        // Opposite side: half way to the secondary, never all the way
        assert_relative_eq!(
            gradient.sample(0.0, constants::PI),
            Vec3::new(0.5, 0.5, 0.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_circular_without_secondary_degenerates() {
        let opts = GradientOptions { circular: true, ..Default::default() };
        let gradient = build_gradient(BASE, &opts);
        let blend = gradient.circular.expect("circular blend");
        assert_eq!(blend.secondary, BASE);
        assert_relative_eq!(gradient.sample(0.5, 2.0), BASE.to_unit(), epsilon = 1e-6);
    }

    #[test]
    fn test_angle_weights() {
        assert_relative_eq!(angle_weight(0.0), 0.0);
        assert_relative_eq!(angle_weight(constants::PI), 1.0, epsilon = 1e-6);
        assert_relative_eq!(angle_weight(constants::HALF_PI), 0.5, epsilon = 1e-6);
        assert_relative_eq!(angle_weight(-constants::HALF_PI), 0.5, epsilon = 1e-6);

        // UV seam sits along +V from the center
        assert_relative_eq!(uv_angle_weight(0.5, 1.0), 0.0);
        assert_relative_eq!(uv_angle_weight(0.5, 0.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(uv_angle_weight(1.0, 0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_wireframe_material_is_flat() {
        let opts = GradientOptions { wireframe: true, circular: true, ..Default::default() };
        let material = build_material(BASE, &opts);
        assert_eq!(material, MaterialDescriptor::Wireframe { color: BASE, opacity: 1.0 });
        assert!(material.is_wireframe());
        assert!(!material.is_transparent());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let opts = GradientOptions {
            transparent: true,
            opacity: 0.4,
            wireframe: false,
            circular: true,
            circular_secondary: Some(BASE.complement()),
        };
        assert_eq!(build_material(BASE, &opts), build_material(BASE, &opts));
    }
}
