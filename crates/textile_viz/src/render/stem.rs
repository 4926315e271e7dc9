//! # Stem Curve Generator
//!
//! The stem is the absorption axis through the middle of the shell. Each
//! stem path has five control points running from black at the bottom to
//! white at the top. The spatial path is a Catmull-Rom curve through the
//! control points, while color is blended strictly piecewise-linearly between
//! neighbouring control points.
//!
//! A straight central stem is always produced. Curved stems bow out from
//! the axis by `max_offset` at mid-height, at one reference angle or at
//! `angle_count` evenly spaced angles.

use crate::color::Color;
use crate::foundation::math::{constants, utils, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Number of control points per stem
pub const STEM_POINT_COUNT: usize = 5;

/// Control point heights, bottom to top
pub const STEM_HEIGHTS: [f32; STEM_POINT_COUNT] = [-1.5, -0.75, 0.0, 0.75, 1.5];

/// Horizontal offset of each control point as a fraction of the max offset
pub const STEM_OFFSET_PROFILE: [f32; STEM_POINT_COUNT] = [0.0, 0.5, 1.0, 0.5, 0.0];

/// Fewest angular stem positions in multiple-stem mode
pub const MIN_STEM_SEGMENTS: u32 = 4;

/// Most angular stem positions in multiple-stem mode
pub const MAX_STEM_SEGMENTS: u32 = 24;

const SEGMENT_COUNT: usize = STEM_POINT_COUNT - 1;

/// Which role a stem path plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StemKind {
    /// Straight path on the axis; always present
    Central,
    /// Path bowed away from the axis
    Curved,
}

/// One stem control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StemControlPoint {
    /// Position in model space
    pub position: Point3,
    /// Color at this point
    pub color: Color,
}

/// A stem path: five control points plus the curve and color laws over them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemPath {
    /// Central or curved
    pub kind: StemKind,
    /// Direction of the bow in radians (0 is +X); 0 for the central path
    pub angle: f32,
    /// Control points, bottom to top
    pub points: [StemControlPoint; STEM_POINT_COUNT],
}

/// The five stop colors for `color`: black, 30% color, color, color blended
/// 70% toward white, white
pub fn stem_colors(color: Color) -> [Color; STEM_POINT_COUNT] {
    [
        Color::BLACK,
        color.scale(0.3),
        color,
        color.blend(Color::WHITE, 0.7),
        Color::WHITE,
    ]
}

/// Brightness multiplier for a stem at `elapsed` seconds and parametric
/// position `t` along it. Stays within [0.8, 1.0].
pub fn pulse(elapsed: f32, t: f32) -> f32 {
    (2.0 * elapsed + 10.0 * t).sin() * 0.1 + 0.9
}

impl StemPath {
    /// Build a path bowing toward `angle` by `max_offset` at mid-height
    pub fn new(kind: StemKind, color: Color, max_offset: f32, angle: f32) -> Self {
        let colors = stem_colors(color);
        let direction = Vec3::new(angle.cos(), 0.0, angle.sin());
        let points = std::array::from_fn(|i| {
            let horizontal = direction * (max_offset * STEM_OFFSET_PROFILE[i]);
            StemControlPoint {
                position: Point3::new(horizontal.x, STEM_HEIGHTS[i], horizontal.z),
                color: colors[i],
            }
        });

        Self { kind, angle, points }
    }

    /// The straight axis path
    pub fn central(color: Color) -> Self {
        Self::new(StemKind::Central, color, 0.0, 0.0)
    }

    /// Whether every control point sits on the axis
    pub fn is_straight(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.position.x.abs() <= f32::EPSILON && p.position.z.abs() <= f32::EPSILON)
    }

    /// Split `t` into a segment index and the local parameter inside it
    fn locate(t: f32) -> (usize, f32) {
        let scaled = utils::clamp(t, 0.0, 1.0) * SEGMENT_COUNT as f32;
        let segment = (scaled.floor() as usize).min(SEGMENT_COUNT - 1);
        (segment, scaled - segment as f32)
    }

    /// Control point `i`, extended past either end by reflection
    fn control(&self, i: isize) -> Vec3 {
        let last = (STEM_POINT_COUNT - 1) as isize;
        let at = |k: usize| self.points[k].position.coords;
        if i < 0 {
            at(0) * 2.0 - at(1)
        } else if i > last {
            at(STEM_POINT_COUNT - 1) * 2.0 - at(STEM_POINT_COUNT - 2)
        } else {
            at(i as usize)
        }
    }

    fn segment_controls(&self, segment: usize) -> [Vec3; 4] {
        let s = segment as isize;
        [self.control(s - 1), self.control(s), self.control(s + 1), self.control(s + 2)]
    }

    /// Point on the Catmull-Rom curve at parametric position `t` in [0, 1]
    ///
    /// Control point `i` is hit exactly at `t = i / 4`.
    pub fn point_at(&self, t: f32) -> Point3 {
        let (segment, u) = Self::locate(t);
        let [p0, p1, p2, p3] = self.segment_controls(segment);
        let u2 = u * u;
        let u3 = u2 * u;

        let coords = (p1 * 2.0
            + (p2 - p0) * u
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * u2
            + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * u3)
            * 0.5;
        Point3::from(coords)
    }

    /// Unit tangent of the curve at `t`
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let (segment, u) = Self::locate(t);
        let [p0, p1, p2, p3] = self.segment_controls(segment);
        let u2 = u * u;

        let derivative = ((p2 - p0)
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * (2.0 * u)
            + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * (3.0 * u2))
            * 0.5;
        derivative.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y)
    }

    /// Color at `t`, linear between adjacent control points
    pub fn color_at(&self, t: f32) -> Vec3 {
        let (segment, u) = Self::locate(t);
        utils::lerp_vec3(
            &self.points[segment].color.to_unit(),
            &self.points[segment + 1].color.to_unit(),
            u,
        )
    }

    /// Color at `t` with the brightness pulse for `elapsed` seconds applied
    pub fn pulsed_color_at(&self, t: f32, elapsed: f32) -> Vec3 {
        self.color_at(t) * pulse(elapsed, utils::clamp(t, 0.0, 1.0))
    }
}

/// Clamp a requested stem count into the supported range
pub fn clamp_segment_count(count: i64) -> u32 {
    count.clamp(i64::from(MIN_STEM_SEGMENTS), i64::from(MAX_STEM_SEGMENTS)) as u32
}

/// Build every stem path for `color`
///
/// The first entry is always the straight central path. With `multiple`
/// off a single curved path at angle 0 follows; with it on, `angle_count`
/// curved paths follow at `2π·i/angle_count`. `angle_count` is clamped to
/// [4, 24] and `max_offset` to [0, 1].
pub fn build_stem_paths(color: Color, max_offset: f32, angle_count: u32, multiple: bool) -> Vec<StemPath> {
    let max_offset = utils::clamp(max_offset, 0.0, 1.0);
    let mut paths = vec![StemPath::central(color)];

    if multiple {
        let count = clamp_segment_count(i64::from(angle_count));
        paths.extend((0..count).map(|i| {
            let angle = constants::TAU * i as f32 / count as f32;
            StemPath::new(StemKind::Curved, color, max_offset, angle)
        }));
    } else {
        paths.push(StemPath::new(StemKind::Curved, color, max_offset, 0.0));
    }

    log::trace!("Built {} stem paths (multiple: {}, offset: {:.2})", paths.len(), multiple, max_offset);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BASE: Color = Color::new(201, 102, 53);

    fn curved(paths: &[StemPath]) -> Vec<&StemPath> {
        paths.iter().filter(|p| p.kind == StemKind::Curved).collect()
    }

    #[test]
    fn test_single_stem_plus_central() {
        let paths = build_stem_paths(BASE, 0.6, 8, false);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].kind, StemKind::Central);
        assert!(paths[0].is_straight());
        assert_eq!(paths[1].kind, StemKind::Curved);
        assert_eq!(paths[1].angle, 0.0);
    }

    #[test]
    fn test_multiple_stems_evenly_spaced() {
        let paths = build_stem_paths(BASE, 0.6, 6, true);
        let curved = curved(&paths);
        assert_eq!(paths.len(), 7);
        assert_eq!(curved.len(), 6);
        for (i, path) in curved.iter().enumerate() {
            assert_relative_eq!(path.angle, constants::TAU * i as f32 / 6.0, epsilon = 1e-6);
        }
        assert_eq!(paths.iter().filter(|p| p.kind == StemKind::Central).count(), 1);
    }

    #[test]
    fn test_angle_count_is_clamped() {
        assert_eq!(curved(&build_stem_paths(BASE, 0.5, 30, true)).len(), 24);
        assert_eq!(curved(&build_stem_paths(BASE, 0.5, 1, true)).len(), 4);
        assert_eq!(clamp_segment_count(-3), 4);
    }

    #[test]
    fn test_control_points_follow_table() {
        let path = StemPath::new(StemKind::Curved, BASE, 0.8, 0.0);
        let expected_x = [0.0, 0.4, 0.8, 0.4, 0.0];
        for (i, point) in path.points.iter().enumerate() {
            assert_relative_eq!(point.position.y, STEM_HEIGHTS[i]);
            assert_relative_eq!(point.position.x, expected_x[i], epsilon = 1e-6);
            assert_relative_eq!(point.position.z, 0.0, epsilon = 1e-6);
        }

        let colors: Vec<Color> = path.points.iter().map(|p| p.color).collect();
        assert_eq!(
            colors,
            vec![
                Color::BLACK,
                Color::new(60, 31, 16),
                BASE,
                Color::new(239, 209, 194),
                Color::WHITE,
            ]
        );
    }

    #[test]
    fn test_curve_passes_through_control_points() {
        let path = StemPath::new(StemKind::Curved, BASE, 0.7, 1.0);
        for (i, point) in path.points.iter().enumerate() {
            let t = i as f32 / 4.0;
            assert_relative_eq!(path.point_at(t), point.position, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_color_is_piecewise_linear() {
        let path = StemPath::central(BASE);
        let expected = (path.points[0].color.to_unit() + path.points[1].color.to_unit()) * 0.5;
        assert_relative_eq!(path.color_at(0.125), expected, epsilon = 1e-6);

        let expected = path.points[2].color.to_unit() * 0.75 + path.points[3].color.to_unit() * 0.25;
        assert_relative_eq!(path.color_at(0.5625), expected, epsilon = 1e-6);
        assert_relative_eq!(path.color_at(1.0), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_zero_offset_collapses_onto_axis() {
        let paths = build_stem_paths(BASE, 0.0, 12, true);
        assert!(paths.iter().all(StemPath::is_straight));
        let path = &paths[3];
        for step in 0..=20 {
            let p = path.point_at(step as f32 / 20.0);
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
        }
        assert_relative_eq!(path.tangent_at(0.3), Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_pulse_only_scales_brightness() {
        for step in 0..50 {
            let value = pulse(step as f32 * 0.37, (step % 10) as f32 / 10.0);
            assert!((0.8 - 1e-6..=1.0 + 1e-6).contains(&value));
        }

        let path = StemPath::central(BASE);
        let plain = path.color_at(0.5);
        let pulsed = path.pulsed_color_at(0.5, 1.3);
        let factor = pulse(1.3, 0.5);
        assert_relative_eq!(pulsed, plain * factor, epsilon = 1e-6);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(build_stem_paths(BASE, 0.4, 9, true), build_stem_paths(BASE, 0.4, 9, true));
    }
}
