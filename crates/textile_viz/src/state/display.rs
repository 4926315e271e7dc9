//! Display-mode state machine

use super::StateError;
use crate::color::{Color, ColorModel};
use crate::foundation::math::{constants, utils};
use crate::render::scene::{SceneDescriptor, SceneStyle};
use crate::render::stem::{clamp_segment_count, MAX_STEM_SEGMENTS, MIN_STEM_SEGMENTS};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound for rotation speed in radians per second
pub const MAX_ROTATION_SPEED: f32 = constants::TAU;

/// How the shell is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Wireframes only, overlay forced on
    Construction,
    /// Alpha-blended gradients
    Transparent,
    /// Opaque gradients
    #[default]
    Solid,
}

impl DisplayMode {
    /// Name used by the UI layer
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Transparent => "transparent",
            Self::Solid => "solid",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "construction" => Ok(Self::Construction),
            "transparent" => Ok(Self::Transparent),
            "solid" => Ok(Self::Solid),
            _ => Err(StateError::UnknownMode(s.to_string())),
        }
    }
}

bitflags! {
    /// Scene parts invalidated since the last regeneration
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// Outer shell material or visibility
        const OUTER = 1 << 0;
        /// Lining material or visibility
        const LINING = 1 << 1;
        /// Wireframe overlay
        const MESH = 1 << 2;
        /// Stem paths
        const STEMS = 1 << 3;
        /// Floor grid
        const GRID = 1 << 4;
        /// Clear color
        const BACKGROUND = 1 << 5;
        /// Surfaces that depend on the display mode
        const SURFACES = Self::OUTER.bits() | Self::LINING.bits() | Self::MESH.bits();
    }
}

/// Everything the UI can toggle
///
/// Given the same `DisplayState` the derived scene is always the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayState {
    /// Current display mode
    pub mode: DisplayMode,
    /// Draw the inner lining
    pub lining_enabled: bool,
    /// Gray lining instead of the complementary color
    pub use_gray_lining: bool,
    /// Angular blend over the vertical ramp
    pub circular_gradient_enabled: bool,
    /// Wireframe overlay outside construction mode
    pub mesh_overlay_visible: bool,
    /// Hue-invert the overlay tint
    pub mesh_color_inverted: bool,
    /// Outer opacity in transparent mode, [0, 1]
    pub transparency_level: f32,
    /// Spin the model
    pub rotation_enabled: bool,
    /// Spin speed in radians per second
    pub rotation_speed: f32,
    /// Draw the floor grid
    pub grid_visible: bool,
    /// Draw the curved stems alongside the central one
    pub use_curved_stem: bool,
    /// Mid-height bow of curved stems, [0, 1]
    pub stem_max_offset: f32,
    /// Number of curved stems in multiple-stem mode, [4, 24]
    pub stem_segment_count: u32,
    /// Spread curved stems around the axis
    pub show_multiple_stems: bool,
    /// Dark background and grid
    pub dark_theme: bool,
    /// Base material color
    pub base_color: Color,
    /// Channel-wise complement of `base_color`
    pub complementary_color: Color,
}

impl Default for DisplayState {
    fn default() -> Self {
        let base_color = Color::from_u32(0xFF5733);
        Self {
            mode: DisplayMode::Solid,
            lining_enabled: false,
            use_gray_lining: false,
            circular_gradient_enabled: false,
            mesh_overlay_visible: false,
            mesh_color_inverted: false,
            transparency_level: 0.5,
            rotation_enabled: false,
            rotation_speed: 0.5,
            grid_visible: true,
            use_curved_stem: true,
            stem_max_offset: 0.3,
            stem_segment_count: 8,
            show_multiple_stems: false,
            dark_theme: true,
            base_color,
            complementary_color: base_color.complement(),
        }
    }
}

impl DisplayState {
    /// Bring every field into range and re-derive the complement
    pub fn sanitized(mut self) -> Self {
        self.transparency_level = utils::clamp(self.transparency_level, 0.0, 1.0);
        self.rotation_speed = utils::clamp(self.rotation_speed, 0.0, MAX_ROTATION_SPEED);
        self.stem_max_offset = utils::clamp(self.stem_max_offset, 0.0, 1.0);
        self.stem_segment_count = self.stem_segment_count.clamp(MIN_STEM_SEGMENTS, MAX_STEM_SEGMENTS);
        self.complementary_color = self.base_color.complement();
        self
    }
}

/// Model spin, advanced by the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    /// Current angle around the vertical axis in [0, 2π)
    pub angle: f32,
}

/// Owner of [`DisplayState`]
///
/// Each setter changes one field and marks the scene parts whose visible
/// output it affects in the current mode. [`regenerate`](Self::regenerate)
/// rebuilds exactly those parts.
#[derive(Debug, Clone)]
pub struct DisplayStateMachine {
    state: DisplayState,
    colors: ColorModel,
    style: SceneStyle,
    rotation: RotationState,
    scene: SceneDescriptor,
    dirty: DirtyFlags,
}

impl DisplayStateMachine {
    /// Create a machine from an initial state
    ///
    /// The scene is derived immediately but every part starts dirty so the
    /// first sync pushes everything.
    pub fn new(initial: DisplayState, style: SceneStyle) -> Self {
        let state = initial.sanitized();
        let colors = ColorModel::new(state.base_color, style.lining_gray);
        let scene = SceneDescriptor::derive(&state, &style);
        log::debug!("Display state machine created in {} mode", state.mode);
        Self {
            state,
            colors,
            style,
            rotation: RotationState::default(),
            scene,
            dirty: DirtyFlags::all(),
        }
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Current mode
    pub fn mode(&self) -> DisplayMode {
        self.state.mode
    }

    /// Color model (base, complement, hue inversion, lining)
    pub fn colors(&self) -> &ColorModel {
        &self.colors
    }

    /// Styling inputs
    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    /// Current model rotation
    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Last regenerated scene
    pub fn scene(&self) -> &SceneDescriptor {
        &self.scene
    }

    /// Parts invalidated since the last regeneration
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Mark parts for regeneration
    pub fn invalidate(&mut self, parts: DirtyFlags) {
        self.dirty |= parts;
    }

    /// Rebuild the invalidated parts and return which ones were rebuilt
    pub fn regenerate(&mut self) -> DirtyFlags {
        let rebuilt = std::mem::replace(&mut self.dirty, DirtyFlags::empty());
        if !rebuilt.is_empty() {
            self.scene.regenerate(rebuilt, &self.state, &self.style);
            log::debug!("Regenerated scene parts: {:?}", rebuilt);
        }
        rebuilt
    }

    fn is_wireframe_mode(&self) -> bool {
        self.state.mode == DisplayMode::Construction
    }

    /// Switch display mode
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.state.mode == mode {
            return;
        }
        log::info!("Display mode: {} -> {}", self.state.mode, mode);
        self.state.mode = mode;
        self.invalidate(DirtyFlags::SURFACES);
    }

    /// Switch display mode by name; unknown names leave the state unchanged
    pub fn set_mode_named(&mut self, name: &str) -> Result<(), StateError> {
        match name.parse::<DisplayMode>() {
            Ok(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            Err(err) => {
                log::warn!("Rejected mode change: {}", err);
                Err(err)
            }
        }
    }

    /// Replace the base color; the complement follows
    pub fn set_base_color(&mut self, color: Color) {
        if self.state.base_color == color {
            return;
        }
        self.colors.set_base_color(color);
        self.state.base_color = self.colors.base();
        self.state.complementary_color = self.colors.complementary();
        self.invalidate(DirtyFlags::SURFACES | DirtyFlags::STEMS);
    }

    /// Show or hide the lining
    pub fn set_lining_enabled(&mut self, enabled: bool) {
        if self.state.lining_enabled != enabled {
            self.state.lining_enabled = enabled;
            // Construction mode shows the lining regardless
            if !self.is_wireframe_mode() {
                self.invalidate(DirtyFlags::LINING);
            }
        }
    }

    /// Gray lining instead of the complement
    pub fn set_gray_lining(&mut self, gray: bool) {
        if self.state.use_gray_lining != gray {
            self.state.use_gray_lining = gray;
            self.invalidate(DirtyFlags::LINING);
        }
    }

    /// Toggle the angular blend
    pub fn set_circular_gradient(&mut self, enabled: bool) {
        if self.state.circular_gradient_enabled != enabled {
            self.state.circular_gradient_enabled = enabled;
            if !self.is_wireframe_mode() {
                self.invalidate(DirtyFlags::OUTER | DirtyFlags::LINING);
            }
        }
    }

    /// Set transparency, clamped to [0, 1]; returns the stored value
    pub fn set_transparency_level(&mut self, level: f32) -> f32 {
        let level = utils::clamp(level, 0.0, 1.0);
        if self.state.transparency_level != level {
            self.state.transparency_level = level;
            if self.state.mode == DisplayMode::Transparent {
                self.invalidate(DirtyFlags::OUTER | DirtyFlags::LINING);
            }
        }
        level
    }

    /// Show or hide the overlay outside construction mode
    pub fn set_mesh_visible(&mut self, visible: bool) {
        if self.state.mesh_overlay_visible != visible {
            self.state.mesh_overlay_visible = visible;
            if !self.is_wireframe_mode() {
                self.invalidate(DirtyFlags::MESH);
            }
        }
    }

    /// Hue-invert the overlay tint
    pub fn set_mesh_inverted(&mut self, inverted: bool) {
        if self.state.mesh_color_inverted != inverted {
            self.state.mesh_color_inverted = inverted;
            self.invalidate(DirtyFlags::MESH);
        }
    }

    /// Start or stop spinning; the angle is kept
    pub fn set_rotation(&mut self, enabled: bool) {
        self.state.rotation_enabled = enabled;
    }

    /// Set spin speed in radians per second, clamped; returns the stored value
    pub fn set_rotation_speed(&mut self, speed: f32) -> f32 {
        self.state.rotation_speed = utils::clamp(speed, 0.0, MAX_ROTATION_SPEED);
        self.state.rotation_speed
    }

    /// Show or hide the grid
    pub fn set_grid(&mut self, visible: bool) {
        if self.state.grid_visible != visible {
            self.state.grid_visible = visible;
            self.invalidate(DirtyFlags::GRID);
        }
    }

    /// Dark or light theme
    pub fn set_theme(&mut self, dark: bool) {
        if self.state.dark_theme != dark {
            self.state.dark_theme = dark;
            self.invalidate(DirtyFlags::GRID | DirtyFlags::BACKGROUND);
        }
    }

    /// Show curved stems alongside the central one
    pub fn set_curved_stem_enabled(&mut self, enabled: bool) {
        if self.state.use_curved_stem != enabled {
            self.state.use_curved_stem = enabled;
            self.invalidate(DirtyFlags::STEMS);
        }
    }

    /// Set the stem bow, clamped to [0, 1]; returns the stored value
    pub fn set_stem_offset(&mut self, offset: f32) -> f32 {
        let offset = utils::clamp(offset, 0.0, 1.0);
        if self.state.stem_max_offset != offset {
            self.state.stem_max_offset = offset;
            if self.state.use_curved_stem {
                self.invalidate(DirtyFlags::STEMS);
            }
        }
        offset
    }

    /// Set the multiple-stem count, clamped to [4, 24]; returns the stored value
    pub fn set_stem_segment_count(&mut self, count: i64) -> u32 {
        let count = clamp_segment_count(count);
        if self.state.stem_segment_count != count {
            self.state.stem_segment_count = count;
            if self.state.use_curved_stem && self.state.show_multiple_stems {
                self.invalidate(DirtyFlags::STEMS);
            }
        }
        count
    }

    /// Spread curved stems around the axis
    pub fn set_multiple_stems(&mut self, multiple: bool) {
        if self.state.show_multiple_stems != multiple {
            self.state.show_multiple_stems = multiple;
            if self.state.use_curved_stem {
                self.invalidate(DirtyFlags::STEMS);
            }
        }
    }

    /// Advance the spin by `delta` seconds when rotation is enabled
    pub fn advance_rotation(&mut self, delta: f32) -> f32 {
        if self.state.rotation_enabled && delta > 0.0 {
            self.rotation.angle = utils::wrap_angle(self.rotation.angle + self.state.rotation_speed * delta);
            log::trace!("Rotation angle {:.3}", self.rotation.angle);
        }
        self.rotation.angle
    }

    /// Lining, gray lining, circular blend and rotation off, angle zeroed,
    /// solid mode. The camera half of a view reset is the caller's job.
    pub fn reset_view(&mut self) {
        self.set_lining_enabled(false);
        self.set_gray_lining(false);
        self.set_circular_gradient(false);
        self.set_rotation(false);
        self.rotation.angle = 0.0;
        self.set_mode(DisplayMode::Solid);
        log::info!("Display state reset to default view");
    }
}
