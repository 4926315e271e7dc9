//! # Textile Viz
//!
//! Core of a 3D textile color visualizer: a cylindrical shell dyed in a base
//! color, an inner lining, and a gradient "stem" showing light absorption
//! through the material.
//!
//! The crate produces descriptors only. A renderer implements
//! [`render::RenderSubstrate`] and receives minimal updates as the UI changes
//! the display state.
//!
//! ## Quick Start
//!
//! ```rust
//! use textile_viz::prelude::*;
//!
//! let mut viz = Visualizer::new(&VisualizerConfig::default()).unwrap();
//! viz.attach_substrate(Box::new(RecordingSubstrate::default()));
//!
//! viz.set_base_color_hex("#FF5733").unwrap();
//! viz.set_mode("transparent").unwrap();
//! viz.set_transparency_level(0.4);
//! viz.move_camera_to_preset("isometric").unwrap();
//!
//! let report = viz.frame(1.0 / 60.0);
//! assert!(report.drawn);
//! assert_eq!(viz.complementary_color().to_hex(), "#00A8CC");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod color;
pub mod render;
pub mod state;
pub mod camera;

mod error;
mod visualizer;

pub use error::VisualizerError;
pub use visualizer::{FrameReport, Visualizer};

/// Common imports for visualizer users
pub mod prelude {
    pub use crate::{
        Visualizer, VisualizerError, FrameReport,
        camera::{CameraController, CameraPose, CameraPreset},
        color::{Color, ColorModel, complement_of, hue_invert},
        config::{Config, ConfigError, VisualizerConfig},
        foundation::{math::{Vec3, Point3}, time::FrameClock},
        render::{
            RenderSubstrate, RecordingSubstrate, SceneDescriptor, SurfaceDescriptor, SurfaceId,
            MaterialDescriptor, GradientDescriptor, StemPath, StemKind,
        },
        state::{DisplayMode, DisplayState},
    };
}
