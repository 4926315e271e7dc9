//! Renderer stand-in that logs every update

use textile_viz::camera::CameraPose;
use textile_viz::color::Color;
use textile_viz::render::tube::{sweep_tube, DEFAULT_RADIAL_SEGMENTS, DEFAULT_TUBE_RADIUS, DEFAULT_TUBE_SAMPLES};
use textile_viz::render::{MaterialDescriptor, RenderSubstrate, StemPath, SurfaceDescriptor, SurfaceId};

/// Logs descriptor updates and rebuilds stem tubes each frame
#[derive(Default)]
pub struct LoggingSubstrate {
    stems: Vec<StemPath>,
    elapsed: f32,
    frames: u64,
    uploaded_bytes: usize,
}

impl LoggingSubstrate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSubstrate for LoggingSubstrate {
    fn apply_surface(&mut self, id: SurfaceId, surface: &SurfaceDescriptor) {
        let kind = match &surface.material {
            MaterialDescriptor::Gradient(g) if g.circular.is_some() => "gradient+circular",
            MaterialDescriptor::Gradient(_) => "gradient",
            MaterialDescriptor::Wireframe { .. } => "wireframe",
            MaterialDescriptor::FlatColor { .. } => "flat",
        };
        log::info!(
            "{:?}: visible={} {} {} opacity={:.2}",
            id,
            surface.visible,
            kind,
            surface.material.primary_color(),
            surface.material.opacity()
        );
    }

    fn set_stems(&mut self, stems: &[StemPath]) {
        log::info!("Stems: {} paths", stems.len());
        self.stems = stems.to_vec();
    }

    fn set_background(&mut self, color: Color) {
        log::info!("Background: {}", color);
    }

    fn set_model_rotation(&mut self, angle: f32) {
        log::trace!("Model rotation: {:.3}", angle);
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        log::trace!("Camera: {:?} -> {:?}", pose.position, pose.target);
    }

    fn set_elapsed(&mut self, seconds: f32) {
        self.elapsed = seconds;
    }

    fn draw(&mut self) {
        // Pulse colors change every frame, so tubes are re-swept each draw
        self.uploaded_bytes = self
            .stems
            .iter()
            .map(|path| {
                let mesh = sweep_tube(path, DEFAULT_TUBE_SAMPLES, DEFAULT_RADIAL_SEGMENTS, DEFAULT_TUBE_RADIUS, self.elapsed);
                mesh.vertex_bytes().len() + mesh.index_bytes().len()
            })
            .sum();
        self.frames += 1;
        if self.frames % 300 == 0 {
            log::debug!("Frame {}: {} bytes of stem geometry", self.frames, self.uploaded_bytes);
        }
    }
}
