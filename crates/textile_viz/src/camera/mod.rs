//! # Camera Transform Controller
//!
//! Tracks the current, default and user-saved camera poses and eases the
//! current pose toward a requested one, one sample per rendered frame.

mod controller;

pub use controller::{CameraController, DEFAULT_MOVE_DURATION_MS};

use crate::foundation::math::{utils, Point3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Camera errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Preset name did not match any preset
    #[error("Unknown camera preset: '{0}'")]
    UnknownPreset(String),
}

/// Camera position plus the point it looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye position in world space
    pub position: Point3,
    /// Look-at target in world space
    pub target: Point3,
}

impl CameraPose {
    /// Create a pose from raw coordinates
    pub fn new(position: [f32; 3], target: [f32; 3]) -> Self {
        Self {
            position: Point3::from(position),
            target: Point3::from(target),
        }
    }

    /// Straight-line blend of position and target
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: utils::lerp_point3(&self.position, &other.position, t),
            target: utils::lerp_point3(&self.target, &other.target, t),
        }
    }

    /// Distance from eye to target
    pub fn distance(&self) -> f32 {
        (self.target - self.position).norm()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new([3.0, 2.0, 5.0], [0.0, 0.0, 0.0])
    }
}

/// Named fixed viewpoints offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraPreset {
    /// Looking along -X at the shell's side
    Side,
    /// Looking down the axis
    Top,
    /// Looking along -Z
    Front,
    /// Equal distance on all three axes
    Isometric,
    /// Close in at mid-height, into the shell wall
    CrossSection,
}

impl CameraPreset {
    /// Every preset, in UI order
    pub const ALL: [CameraPreset; 5] = [
        CameraPreset::Side,
        CameraPreset::Top,
        CameraPreset::Front,
        CameraPreset::Isometric,
        CameraPreset::CrossSection,
    ];

    /// The literal pose for this preset
    pub fn pose(self) -> CameraPose {
        match self {
            Self::Side => CameraPose::new([5.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            // Slight Z offset keeps look-at well defined with a Y-up camera
            Self::Top => CameraPose::new([0.0, 5.0, 0.01], [0.0, 0.0, 0.0]),
            Self::Front => CameraPose::new([0.0, 0.0, 5.0], [0.0, 0.0, 0.0]),
            Self::Isometric => CameraPose::new([3.0, 3.0, 3.0], [0.0, 0.0, 0.0]),
            Self::CrossSection => CameraPose::new([0.0, 0.5, 2.2], [0.0, 0.0, 0.0]),
        }
    }

    /// Name used by the UI layer
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Side => "side",
            Self::Top => "top",
            Self::Front => "front",
            Self::Isometric => "isometric",
            Self::CrossSection => "cross-section",
        }
    }
}

impl fmt::Display for CameraPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraPreset {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == name)
            .ok_or_else(|| CameraError::UnknownPreset(s.to_string()))
    }
}
