//! Visualizer facade
//!
//! Owns the display state machine, the camera controller and the optional
//! renderer, and exposes the entry points the UI layer calls. There is no
//! global instance; the application constructs one and passes it around.

use crate::camera::{CameraController, CameraPose, CameraPreset};
use crate::color::Color;
use crate::config::VisualizerConfig;
use crate::error::VisualizerError;
use crate::render::adapter::{RenderSubstrate, SceneAdapter, SyncReport};
use crate::render::scene::SceneDescriptor;
use crate::state::{DisplayMode, DisplayState, DisplayStateMachine};

/// What one call to [`Visualizer::frame`] did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Model rotation after this frame
    pub rotation: f32,
    /// Whether a camera move was sampled this frame
    pub camera_moved: bool,
    /// What the adapter pushed
    pub sync: SyncReport,
    /// Whether a substrate drew the frame
    pub drawn: bool,
}

/// The visualization core
pub struct Visualizer {
    display: DisplayStateMachine,
    camera: CameraController,
    adapter: SceneAdapter,
    substrate: Option<Box<dyn RenderSubstrate>>,
    elapsed: f32,
    frame_count: u64,
}

impl Visualizer {
    /// Build a visualizer from configuration
    pub fn new(config: &VisualizerConfig) -> Result<Self, VisualizerError> {
        config.validate()?;
        log::info!(
            "Initializing visualizer: {} mode, base color {}",
            config.display.mode,
            config.display.base_color
        );

        let display = DisplayStateMachine::new(config.display.clone(), config.style());
        let camera = CameraController::new(config.camera.default_pose, config.camera.fit_pose)
            .with_move_duration(config.camera.move_duration_ms);

        Ok(Self {
            display,
            camera,
            adapter: SceneAdapter::new(),
            substrate: None,
            elapsed: 0.0,
            frame_count: 0,
        })
    }

    /// Attach a renderer and push the whole scene to it
    ///
    /// Returns the previously attached renderer, if any.
    pub fn attach_substrate(&mut self, substrate: Box<dyn RenderSubstrate>) -> Option<Box<dyn RenderSubstrate>> {
        let previous = self.substrate.replace(substrate);
        self.adapter.force_full_sync();
        log::info!("Render substrate attached");
        self.refresh();
        previous
    }

    /// Detach the renderer; state changes keep being recorded
    pub fn detach_substrate(&mut self) -> Option<Box<dyn RenderSubstrate>> {
        log::info!("Render substrate detached");
        self.substrate.take()
    }

    /// Whether a renderer is attached
    pub fn has_substrate(&self) -> bool {
        self.substrate.is_some()
    }

    /// Regenerate invalidated scene parts and push them, if a renderer is attached
    fn refresh(&mut self) -> SyncReport {
        let Some(substrate) = self.substrate.as_mut() else {
            log::debug!("No render substrate; deferring regeneration of {:?}", self.display.dirty());
            return SyncReport::default();
        };
        self.display.regenerate();
        self.adapter.sync(self.display.scene(), substrate.as_mut())
    }

    // Color

    /// Replace the base color
    pub fn set_base_color(&mut self, color: Color) {
        self.display.set_base_color(color);
        self.refresh();
    }

    /// Replace the base color from a hex string
    pub fn set_base_color_hex(&mut self, hex: &str) -> Result<(), VisualizerError> {
        let color = Color::from_hex(hex).map_err(|err| {
            log::warn!("Rejected base color: {}", err);
            err
        })?;
        self.set_base_color(color);
        Ok(())
    }

    /// Replace the base color from unchecked channels; out-of-range values clamp
    pub fn set_base_color_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.set_base_color(Color::from_channels_clamped(r, g, b));
    }

    // Display state

    /// Switch display mode by name; unknown names are rejected
    pub fn set_mode(&mut self, name: &str) -> Result<(), VisualizerError> {
        self.display.set_mode_named(name)?;
        self.refresh();
        Ok(())
    }

    /// Switch display mode
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display.set_mode(mode);
        self.refresh();
    }

    /// Show or hide the lining
    pub fn set_lining_enabled(&mut self, enabled: bool) {
        self.display.set_lining_enabled(enabled);
        self.refresh();
    }

    /// Gray lining instead of the complement
    pub fn set_gray_lining(&mut self, gray: bool) {
        self.display.set_gray_lining(gray);
        self.refresh();
    }

    /// Toggle the angular blend
    pub fn set_circular_gradient(&mut self, enabled: bool) {
        self.display.set_circular_gradient(enabled);
        self.refresh();
    }

    /// Transparency level, clamped to [0, 1]; returns the stored value
    pub fn set_transparency_level(&mut self, level: f32) -> f32 {
        let stored = self.display.set_transparency_level(level);
        self.refresh();
        stored
    }

    /// Show or hide the overlay outside construction mode
    pub fn set_mesh_visible(&mut self, visible: bool) {
        self.display.set_mesh_visible(visible);
        self.refresh();
    }

    /// Hue-invert the overlay tint
    pub fn set_mesh_inverted(&mut self, inverted: bool) {
        self.display.set_mesh_inverted(inverted);
        self.refresh();
    }

    /// Start or stop spinning
    pub fn set_rotation(&mut self, enabled: bool) {
        self.display.set_rotation(enabled);
    }

    /// Spin speed in radians per second, clamped; returns the stored value
    pub fn set_rotation_speed(&mut self, speed: f32) -> f32 {
        self.display.set_rotation_speed(speed)
    }

    /// Show or hide the grid
    pub fn set_grid(&mut self, visible: bool) {
        self.display.set_grid(visible);
        self.refresh();
    }

    /// Dark or light theme
    pub fn set_theme(&mut self, dark: bool) {
        self.display.set_theme(dark);
        self.refresh();
    }

    /// Show curved stems alongside the central one
    pub fn set_curved_stem_enabled(&mut self, enabled: bool) {
        self.display.set_curved_stem_enabled(enabled);
        self.refresh();
    }

    /// Stem bow, clamped to [0, 1]; returns the stored value
    pub fn set_stem_offset(&mut self, offset: f32) -> f32 {
        let stored = self.display.set_stem_offset(offset);
        self.refresh();
        stored
    }

    /// Multiple-stem count, clamped to [4, 24]; returns the stored value
    pub fn set_stem_segment_count(&mut self, count: i64) -> u32 {
        let stored = self.display.set_stem_segment_count(count);
        self.refresh();
        stored
    }

    /// Spread curved stems around the axis
    pub fn set_multiple_stems(&mut self, multiple: bool) {
        self.display.set_multiple_stems(multiple);
        self.refresh();
    }

    /// Default view: lining, gray lining, circular blend and rotation off,
    /// solid mode, camera easing back to its default pose
    pub fn reset_to_default_view(&mut self) {
        self.display.reset_view();
        self.camera.reset_to_default();
        self.refresh();
    }

    // Camera

    /// Ease the camera back to its default pose
    pub fn reset_camera(&mut self) {
        self.camera.reset_to_default();
    }

    /// Make the current camera pose the default
    pub fn save_camera_as_default(&mut self) {
        self.camera.save_current_as_default();
    }

    /// Remember the current camera pose for zoom-to-fit
    pub fn save_camera_as_user(&mut self) {
        self.camera.save_current_as_user();
    }

    /// Ease to the saved pose, or the built-in framing
    pub fn zoom_to_fit(&mut self) {
        self.camera.zoom_to_fit();
    }

    /// Ease to a named preset; unknown names are rejected
    pub fn move_camera_to_preset(&mut self, name: &str) -> Result<(), VisualizerError> {
        let preset = name.parse::<CameraPreset>().map_err(|err| {
            log::warn!("Rejected camera preset: {}", err);
            err
        })?;
        self.camera.move_to_preset(preset);
        Ok(())
    }

    /// Ease to an arbitrary pose
    pub fn move_camera_to(&mut self, pose: CameraPose, duration_ms: u32) {
        self.camera.move_to(pose, duration_ms);
    }

    /// Set the camera pose directly, e.g. from orbit controls
    pub fn set_camera_transform(&mut self, pose: CameraPose) {
        self.camera.set_current(pose);
    }

    // Read accessors

    /// Current base color
    pub fn base_color(&self) -> Color {
        self.display.state().base_color
    }

    /// Complement of the base color
    pub fn complementary_color(&self) -> Color {
        self.display.state().complementary_color
    }

    /// Current display mode
    pub fn mode(&self) -> DisplayMode {
        self.display.mode()
    }

    /// Current camera pose
    pub fn camera_pose(&self) -> CameraPose {
        self.camera.current()
    }

    /// Camera controller, read-only
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Display state, read-only
    pub fn state(&self) -> &DisplayState {
        self.display.state()
    }

    /// Last regenerated scene
    ///
    /// Without a renderer attached this may lag behind the state until one is.
    pub fn scene(&self) -> &SceneDescriptor {
        self.display.scene()
    }

    /// Scene derived fresh from the current state
    pub fn derive_scene(&self) -> SceneDescriptor {
        SceneDescriptor::derive(self.display.state(), self.display.style())
    }

    /// Model rotation angle in radians
    pub fn rotation_angle(&self) -> f32 {
        self.display.rotation().angle
    }

    /// Pulse animation time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Copy of the display state for debug export
    pub fn snapshot(&self) -> DisplayState {
        self.display.state().clone()
    }

    // Frame loop

    /// Advance one frame by `delta` seconds and draw it
    ///
    /// Rotation, pulse time and the camera are advanced before anything is
    /// pushed to the renderer, so the draw always sees this frame's values.
    pub fn frame(&mut self, delta: f32) -> FrameReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.frame_count += 1;

        let rotation = self.display.advance_rotation(delta);
        self.elapsed += delta;
        let camera_moved = self.camera.update(delta).is_some();

        let sync = self.refresh();
        let drawn = match self.substrate.as_mut() {
            Some(substrate) => {
                self.adapter.sync_frame(rotation, &self.camera.current(), self.elapsed, substrate.as_mut());
                substrate.draw();
                true
            }
            None => false,
        };

        log::trace!("Frame {} (dt {:.4}s, drawn: {})", self.frame_count, delta, drawn);
        FrameReport {
            frame: self.frame_count,
            rotation,
            camera_moved,
            sync,
            drawn,
        }
    }
}
