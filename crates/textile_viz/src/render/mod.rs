//! # Rendering Descriptors
//!
//! Everything here is pure data generation. The generators never touch the
//! display state; they take a snapshot and return fresh descriptors, which the
//! adapter hands to whatever renderer is attached.
//!
//! - **material**: vertical gradient ramp, wireframe and flat materials
//! - **stem**: five-point absorption stems and their color law
//! - **tube**: sweeps a stem into a vertex/index mesh
//! - **scene**: derives the full scene from a display state
//! - **adapter**: the renderer trait and the diffing adapter

pub mod material;
pub mod stem;
pub mod tube;
pub mod scene;
pub mod adapter;

pub use adapter::{RecordingSubstrate, RenderSubstrate, SceneAdapter, SyncReport};
pub use material::{build_gradient, build_material, GradientDescriptor, GradientOptions, MaterialDescriptor};
pub use scene::{SceneDescriptor, SceneStyle, SurfaceDescriptor, SurfaceId, ThemePalette};
pub use stem::{build_stem_paths, StemKind, StemPath};
pub use tube::{sweep_tube, TubeMesh, TubeVertex};
