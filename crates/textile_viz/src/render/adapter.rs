//! # Substrate Adapter
//!
//! The rendering substrate owns long-lived scene objects. The adapter keeps
//! the last descriptor it pushed and forwards only the parts that changed,
//! so the core stays free of any scene-graph API.

use super::scene::{SceneDescriptor, SurfaceDescriptor, SurfaceId};
use super::stem::StemPath;
use crate::camera::CameraPose;
use crate::color::Color;

/// What the core needs from a renderer
pub trait RenderSubstrate {
    /// Apply visibility and material to a long-lived surface
    fn apply_surface(&mut self, id: SurfaceId, surface: &SurfaceDescriptor);

    /// Replace all stem tubes
    fn set_stems(&mut self, stems: &[StemPath]);

    /// Set the clear color
    fn set_background(&mut self, color: Color);

    /// Rotate the model around its vertical axis
    fn set_model_rotation(&mut self, angle: f32);

    /// Move the camera
    fn set_camera(&mut self, pose: &CameraPose);

    /// Animation time in seconds for the stem pulse
    fn set_elapsed(&mut self, seconds: f32);

    /// Draw one frame with everything applied so far
    fn draw(&mut self);
}

/// What one [`SceneAdapter::sync`] pushed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Surfaces re-applied
    pub surfaces: usize,
    /// Whether stems were replaced
    pub stems: bool,
    /// Whether the clear color was set
    pub background: bool,
}

impl SyncReport {
    /// Nothing was pushed
    pub fn is_empty(&self) -> bool {
        self.surfaces == 0 && !self.stems && !self.background
    }
}

/// Diffs scene descriptors against what the substrate already has
#[derive(Debug, Clone, Default)]
pub struct SceneAdapter {
    applied: Option<SceneDescriptor>,
    rotation: Option<f32>,
    camera: Option<CameraPose>,
}

impl SceneAdapter {
    /// Create an adapter that has pushed nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget what was pushed; the next sync sends everything
    pub fn force_full_sync(&mut self) {
        self.applied = None;
        self.rotation = None;
        self.camera = None;
    }

    /// Push the parts of `scene` that differ from the last push
    pub fn sync(&mut self, scene: &SceneDescriptor, substrate: &mut dyn RenderSubstrate) -> SyncReport {
        let mut report = SyncReport::default();
        let previous = self.applied.as_ref();

        for id in [SurfaceId::Outer, SurfaceId::Lining, SurfaceId::MeshOverlay, SurfaceId::Grid] {
            let next = scene.surface(id);
            if previous.map_or(true, |prev| prev.surface(id) != next) {
                substrate.apply_surface(id, next);
                report.surfaces += 1;
            }
        }

        if previous.map_or(true, |prev| prev.stems != scene.stems) {
            substrate.set_stems(&scene.stems);
            report.stems = true;
        }

        if previous.map_or(true, |prev| prev.background != scene.background) {
            substrate.set_background(scene.background);
            report.background = true;
        }

        if !report.is_empty() {
            log::debug!("Scene sync: {:?}", report);
            self.applied = Some(scene.clone());
        }
        report
    }

    /// Push per-frame animation values; rotation and camera only on change
    pub fn sync_frame(
        &mut self,
        rotation: f32,
        camera: &CameraPose,
        elapsed: f32,
        substrate: &mut dyn RenderSubstrate,
    ) {
        if self.rotation != Some(rotation) {
            substrate.set_model_rotation(rotation);
            self.rotation = Some(rotation);
        }
        if self.camera.as_ref() != Some(camera) {
            substrate.set_camera(camera);
            self.camera = Some(*camera);
        }
        substrate.set_elapsed(elapsed);
    }
}

/// Substrate that keeps the last value of every call
///
/// Useful for headless runs and for checking what the adapter pushed.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubstrate {
    /// Last descriptor per surface
    pub surfaces: Vec<(SurfaceId, SurfaceDescriptor)>,
    /// Last stem set
    pub stems: Vec<StemPath>,
    /// Last clear color
    pub background: Option<Color>,
    /// Last model rotation
    pub rotation: f32,
    /// Last camera pose
    pub camera: Option<CameraPose>,
    /// Last pulse time
    pub elapsed: f32,
    /// Number of `apply_surface` calls
    pub surface_updates: usize,
    /// Number of `set_stems` calls
    pub stem_updates: usize,
    /// Number of `draw` calls
    pub frames: u64,
}

impl RecordingSubstrate {
    /// Last descriptor applied to `id`
    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceDescriptor> {
        self.surfaces.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }
}

impl RenderSubstrate for RecordingSubstrate {
    fn apply_surface(&mut self, id: SurfaceId, surface: &SurfaceDescriptor) {
        self.surface_updates += 1;
        match self.surfaces.iter_mut().find(|(sid, _)| *sid == id) {
            Some(entry) => entry.1 = surface.clone(),
            None => self.surfaces.push((id, surface.clone())),
        }
    }

    fn set_stems(&mut self, stems: &[StemPath]) {
        self.stem_updates += 1;
        self.stems = stems.to_vec();
    }

    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn set_model_rotation(&mut self, angle: f32) {
        self.rotation = angle;
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        self.camera = Some(*pose);
    }

    fn set_elapsed(&mut self, seconds: f32) {
        self.elapsed = seconds;
    }

    fn draw(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::SceneStyle;
    use crate::state::{DisplayMode, DisplayState};

    #[test]
    fn test_first_sync_pushes_everything() {
        let scene = SceneDescriptor::derive(&DisplayState::default(), &SceneStyle::default());
        let mut adapter = SceneAdapter::new();
        let mut substrate = RecordingSubstrate::default();

        let report = adapter.sync(&scene, &mut substrate);
        assert_eq!(report, SyncReport { surfaces: 4, stems: true, background: true });
        assert_eq!(substrate.surface(SurfaceId::Outer), Some(&scene.outer));
    }

    #[test]
    fn test_unchanged_scene_pushes_nothing() {
        let scene = SceneDescriptor::derive(&DisplayState::default(), &SceneStyle::default());
        let mut adapter = SceneAdapter::new();
        let mut substrate = RecordingSubstrate::default();
        adapter.sync(&scene, &mut substrate);

        assert!(adapter.sync(&scene, &mut substrate).is_empty());
        assert_eq!(substrate.surface_updates, 4);
        assert_eq!(substrate.stem_updates, 1);
    }

    #[test]
    fn test_only_changed_surfaces_are_pushed() {
        let style = SceneStyle::default();
        let mut state = DisplayState::default();
        let mut adapter = SceneAdapter::new();
        let mut substrate = RecordingSubstrate::default();
        adapter.sync(&SceneDescriptor::derive(&state, &style), &mut substrate);

        state.mesh_overlay_visible = true;
        let report = adapter.sync(&SceneDescriptor::derive(&state, &style), &mut substrate);
        assert_eq!(report, SyncReport { surfaces: 1, stems: false, background: false });
        assert!(substrate.surface(SurfaceId::MeshOverlay).is_some_and(|s| s.visible));

        state.mode = DisplayMode::Construction;
        let report = adapter.sync(&SceneDescriptor::derive(&state, &style), &mut substrate);
        // Overlay was already visible; outer and lining turn into wireframes
        assert_eq!(report.surfaces, 2);
    }

    #[test]
    fn test_force_full_sync() {
        let scene = SceneDescriptor::derive(&DisplayState::default(), &SceneStyle::default());
        let mut adapter = SceneAdapter::new();
        let mut substrate = RecordingSubstrate::default();
        adapter.sync(&scene, &mut substrate);

        adapter.force_full_sync();
        assert_eq!(adapter.sync(&scene, &mut substrate).surfaces, 4);
    }

    #[test]
    fn test_frame_values_pushed_on_change() {
        let mut adapter = SceneAdapter::new();
        let mut substrate = RecordingSubstrate::default();
        let pose = CameraPose::default();

        adapter.sync_frame(0.5, &pose, 1.0, &mut substrate);
        substrate.camera = None;
        adapter.sync_frame(0.5, &pose, 1.1, &mut substrate);
        assert!(substrate.camera.is_none());
        assert_eq!(substrate.elapsed, 1.1);
        assert_eq!(substrate.rotation, 0.5);
    }
}
