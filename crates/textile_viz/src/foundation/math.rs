//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of scalar helpers the
//! generators and the camera controller share.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Point3, Vec3};

    /// Clamp a value between min and max
    ///
    /// NaN input collapses to `min` so that a bad UI value can never poison
    /// stored state.
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value.is_nan() || value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Component-wise linear interpolation between two vectors
    pub fn lerp_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// Linear interpolation between two points
    pub fn lerp_point3(a: &Point3, b: &Point3, t: f32) -> Point3 {
        a + (b - a) * t
    }

    /// Ease-out cubic: `1 - (1 - p)^3` with `p` clamped to [0, 1]
    pub fn ease_out_cubic(p: f32) -> f32 {
        let p = clamp(p, 0.0, 1.0);
        1.0 - (1.0 - p).powi(3)
    }

    /// Wrap an angle into [0, 2π)
    pub fn wrap_angle(angle: f32) -> f32 {
        let wrapped = angle.rem_euclid(constants::TAU);
        // rem_euclid can land exactly on TAU due to rounding
        if wrapped >= constants::TAU { 0.0 } else { wrapped }
    }
}
