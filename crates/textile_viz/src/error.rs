//! Top-level error type

use crate::camera::CameraError;
use crate::color::ColorError;
use crate::config::ConfigError;
use crate::state::StateError;
use thiserror::Error;

/// Errors surfaced to the UI layer
///
/// None of these are fatal: a rejected call leaves the visualizer exactly as
/// it was.
#[derive(Error, Debug)]
pub enum VisualizerError {
    /// Rejected display-state input
    #[error("Display state error: {0}")]
    State(#[from] StateError),

    /// Rejected color input
    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    /// Rejected camera input
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
