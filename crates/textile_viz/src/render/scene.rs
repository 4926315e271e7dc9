//! # Scene Descriptor
//!
//! Pure derivation of everything the substrate draws from a [`DisplayState`].
//! Each part has its own builder so a setter can regenerate only what it
//! invalidated; building every part is always equivalent.

use super::material::{build_material, GradientOptions, MaterialDescriptor};
use super::stem::{build_stem_paths, StemKind, StemPath};
use crate::color::Color;
use crate::state::{DirtyFlags, DisplayMode, DisplayState};
use serde::{Deserialize, Serialize};

/// Minimum lining opacity in transparent mode
pub const MIN_LINING_OPACITY: f32 = 0.05;

/// Surfaces the substrate keeps as long-lived objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceId {
    /// Outer cylindrical shell
    Outer,
    /// Inner lining
    Lining,
    /// Wireframe overlay on the shell
    MeshOverlay,
    /// Floor grid
    Grid,
}

/// Visibility plus material of one surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    /// Whether the surface is drawn at all
    pub visible: bool,
    /// How it is drawn
    pub material: MaterialDescriptor,
}

/// Background and grid colors for the two themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemePalette {
    /// Dark theme clear color
    pub dark_background: Color,
    /// Dark theme grid lines
    pub dark_grid: Color,
    /// Light theme clear color
    pub light_background: Color,
    /// Light theme grid lines
    pub light_grid: Color,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            dark_background: Color::from_u32(0x1A1A1A),
            dark_grid: Color::from_u32(0x444444),
            light_background: Color::from_u32(0xF0F0F0),
            light_grid: Color::from_u32(0xBBBBBB),
        }
    }
}

impl ThemePalette {
    /// Clear color for the theme
    pub fn background(&self, dark: bool) -> Color {
        if dark { self.dark_background } else { self.light_background }
    }

    /// Grid color for the theme
    pub fn grid(&self, dark: bool) -> Color {
        if dark { self.dark_grid } else { self.light_grid }
    }
}

/// Fixed styling inputs that are not part of the mutable display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStyle {
    /// Gray used for tonal linings
    pub lining_gray: Color,
    /// Theme colors
    pub palette: ThemePalette,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            lining_gray: Color::from_u32(0x808080),
            palette: ThemePalette::default(),
        }
    }
}

/// Everything the substrate needs to draw one frame, minus animation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Outer shell
    pub outer: SurfaceDescriptor,
    /// Inner lining
    pub lining: SurfaceDescriptor,
    /// Wireframe overlay
    pub mesh_overlay: SurfaceDescriptor,
    /// Floor grid
    pub grid: SurfaceDescriptor,
    /// Stem paths; the central path is always first
    pub stems: Vec<StemPath>,
    /// Clear color
    pub background: Color,
}

impl SceneDescriptor {
    /// Derive the whole scene
    pub fn derive(state: &DisplayState, style: &SceneStyle) -> Self {
        Self {
            outer: outer_surface(state),
            lining: lining_surface(state, style),
            mesh_overlay: mesh_overlay(state),
            grid: grid(state, style),
            stems: stems(state),
            background: style.palette.background(state.dark_theme),
        }
    }

    /// Rebuild only the parts named in `dirty`
    pub fn regenerate(&mut self, dirty: DirtyFlags, state: &DisplayState, style: &SceneStyle) {
        if dirty.contains(DirtyFlags::OUTER) {
            self.outer = outer_surface(state);
        }
        if dirty.contains(DirtyFlags::LINING) {
            self.lining = lining_surface(state, style);
        }
        if dirty.contains(DirtyFlags::MESH) {
            self.mesh_overlay = mesh_overlay(state);
        }
        if dirty.contains(DirtyFlags::GRID) {
            self.grid = grid(state, style);
        }
        if dirty.contains(DirtyFlags::STEMS) {
            self.stems = stems(state);
        }
        if dirty.contains(DirtyFlags::BACKGROUND) {
            self.background = style.palette.background(state.dark_theme);
        }
    }

    /// Surface by id
    pub fn surface(&self, id: SurfaceId) -> &SurfaceDescriptor {
        match id {
            SurfaceId::Outer => &self.outer,
            SurfaceId::Lining => &self.lining,
            SurfaceId::MeshOverlay => &self.mesh_overlay,
            SurfaceId::Grid => &self.grid,
        }
    }
}

/// Outer shell: wireframe in construction mode, ramp otherwise
pub fn outer_surface(state: &DisplayState) -> SurfaceDescriptor {
    let opts = match state.mode {
        DisplayMode::Construction => GradientOptions { wireframe: true, ..Default::default() },
        DisplayMode::Transparent => GradientOptions {
            transparent: true,
            opacity: state.transparency_level,
            circular: state.circular_gradient_enabled,
            circular_secondary: Some(state.complementary_color),
            ..Default::default()
        },
        DisplayMode::Solid => GradientOptions {
            circular: state.circular_gradient_enabled,
            circular_secondary: Some(state.complementary_color),
            ..Default::default()
        },
    };

    SurfaceDescriptor {
        visible: true,
        material: build_material(state.base_color, &opts),
    }
}

/// Color the lining is drawn in
pub fn lining_color(state: &DisplayState, style: &SceneStyle) -> Color {
    if state.use_gray_lining { style.lining_gray } else { state.complementary_color }
}

/// Inner lining
///
/// Construction mode shows the lining even when it is disabled.
pub fn lining_surface(state: &DisplayState, style: &SceneStyle) -> SurfaceDescriptor {
    let color = lining_color(state, style);
    let (visible, opts) = match state.mode {
        DisplayMode::Construction => (true, GradientOptions { wireframe: true, ..Default::default() }),
        DisplayMode::Transparent => (
            state.lining_enabled,
            GradientOptions {
                transparent: true,
                opacity: MIN_LINING_OPACITY.max(state.transparency_level * 0.5),
                circular: state.circular_gradient_enabled,
                circular_secondary: Some(state.base_color),
                ..Default::default()
            },
        ),
        DisplayMode::Solid => (
            state.lining_enabled,
            GradientOptions {
                circular: state.circular_gradient_enabled,
                circular_secondary: Some(state.base_color),
                ..Default::default()
            },
        ),
    };

    SurfaceDescriptor {
        visible,
        material: build_material(color, &opts),
    }
}

/// Tint of the wireframe overlay
pub fn mesh_color(state: &DisplayState) -> Color {
    if state.mesh_color_inverted {
        state.base_color.hue_invert()
    } else {
        state.base_color
    }
}

/// Wireframe overlay; forced on in construction mode
pub fn mesh_overlay(state: &DisplayState) -> SurfaceDescriptor {
    SurfaceDescriptor {
        visible: state.mode == DisplayMode::Construction || state.mesh_overlay_visible,
        material: MaterialDescriptor::wireframe(mesh_color(state)),
    }
}

/// Floor grid
pub fn grid(state: &DisplayState, style: &SceneStyle) -> SurfaceDescriptor {
    SurfaceDescriptor {
        visible: state.grid_visible,
        material: MaterialDescriptor::flat(style.palette.grid(state.dark_theme)),
    }
}

/// Stem paths to draw: always the central one, curved ones when enabled
pub fn stems(state: &DisplayState) -> Vec<StemPath> {
    let mut paths = build_stem_paths(
        state.base_color,
        state.stem_max_offset,
        state.stem_segment_count,
        state.show_multiple_stems,
    );
    if !state.use_curved_stem {
        paths.retain(|path| path.kind == StemKind::Central);
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::{CircularBlend, GradientDescriptor, CIRCULAR_BLEND_CAP};
    use approx::assert_relative_eq;

    fn gradient(surface: &SurfaceDescriptor) -> &GradientDescriptor {
        match &surface.material {
            MaterialDescriptor::Gradient(gradient) => gradient,
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    fn state(mode: DisplayMode) -> DisplayState {
        DisplayState { mode, lining_enabled: true, ..DisplayState::default() }
    }

    #[test]
    fn test_solid_mode_policy() {
        let state = state(DisplayMode::Solid);
        let scene = SceneDescriptor::derive(&state, &SceneStyle::default());
        assert_eq!(gradient(&scene.outer).opacity, 1.0);
        assert_eq!(gradient(&scene.lining).opacity, 1.0);
        assert_eq!(gradient(&scene.outer).base_color(), state.base_color);
        assert_eq!(gradient(&scene.lining).base_color(), state.complementary_color);
        assert!(scene.lining.visible);
        assert_eq!(scene.mesh_overlay.visible, state.mesh_overlay_visible);
    }

    #[test]
    fn test_circular_gradient_reaches_outer_and_lining() {
        for mode in [DisplayMode::Solid, DisplayMode::Transparent] {
            let mut state = state(mode);
            state.circular_gradient_enabled = true;
            let scene = SceneDescriptor::derive(&state, &SceneStyle::default());
            assert_eq!(
                gradient(&scene.outer).circular,
                Some(CircularBlend {
                    secondary: state.complementary_color,
                    max_weight: CIRCULAR_BLEND_CAP,
                })
            );
            assert_eq!(
                gradient(&scene.lining).circular,
                Some(CircularBlend {
                    secondary: state.base_color,
                    max_weight: CIRCULAR_BLEND_CAP,
                })
            );

            state.circular_gradient_enabled = false;
            let scene = SceneDescriptor::derive(&state, &SceneStyle::default());
            assert_eq!(gradient(&scene.outer).circular, None);
            assert_eq!(gradient(&scene.lining).circular, None);
        }
    }

    #[test]
    fn test_transparent_mode_opacities() {
        let mut state = state(DisplayMode::Transparent);
        state.transparency_level = 0.6;
        let scene = SceneDescriptor::derive(&state, &SceneStyle::default());
        assert_relative_eq!(gradient(&scene.outer).opacity, 0.6);
        assert_relative_eq!(gradient(&scene.lining).opacity, 0.3);
        assert!(gradient(&scene.outer).transparent);

        state.transparency_level = 0.02;
        let lining = lining_surface(&state, &SceneStyle::default());
        assert_relative_eq!(gradient(&lining).opacity, MIN_LINING_OPACITY);
    }

    #[test]
    fn test_construction_mode_forces_wireframes_visible() {
        let mut state = state(DisplayMode::Construction);
        state.lining_enabled = false;
        state.mesh_overlay_visible = false;
        let scene = SceneDescriptor::derive(&state, &SceneStyle::default());

        assert_eq!(scene.outer.material, MaterialDescriptor::wireframe(state.base_color));
        assert_eq!(scene.lining.material, MaterialDescriptor::wireframe(state.complementary_color));
        assert!(scene.lining.visible);
        assert!(scene.mesh_overlay.visible);
    }

    #[test]
    fn test_lining_hidden_when_disabled() {
        for mode in [DisplayMode::Solid, DisplayMode::Transparent] {
            let mut state = state(mode);
            state.lining_enabled = false;
            assert!(!lining_surface(&state, &SceneStyle::default()).visible);
        }
    }

    #[test]
    fn test_gray_lining_uses_style_gray() {
        let mut state = state(DisplayMode::Solid);
        state.use_gray_lining = true;
        let style = SceneStyle { lining_gray: Color::new(90, 90, 90), ..Default::default() };
        assert_eq!(gradient(&lining_surface(&state, &style)).base_color(), Color::new(90, 90, 90));
    }

    #[test]
    fn test_mesh_inversion_uses_hue_inversion() {
        let mut state = state(DisplayMode::Solid);
        state.mesh_color_inverted = true;
        assert_eq!(mesh_color(&state), state.base_color.hue_invert());
        assert_ne!(mesh_color(&state), state.complementary_color);
    }

    #[test]
    fn test_stems_follow_curved_toggle() {
        let mut state = state(DisplayMode::Solid);
        state.use_curved_stem = false;
        state.show_multiple_stems = true;
        let only_central = stems(&state);
        assert_eq!(only_central.len(), 1);
        assert_eq!(only_central[0].kind, StemKind::Central);

        state.use_curved_stem = true;
        assert_eq!(stems(&state).len(), state.stem_segment_count as usize + 1);
    }

    #[test]
    fn test_theme_switches_background_and_grid() {
        let style = SceneStyle::default();
        let mut state = state(DisplayMode::Solid);
        state.dark_theme = false;
        let scene = SceneDescriptor::derive(&state, &style);
        assert_eq!(scene.background, style.palette.light_background);
        assert_eq!(scene.grid.material.primary_color(), style.palette.light_grid);
    }

    #[test]
    fn test_partial_regeneration_matches_full_derive() {
        let style = SceneStyle::default();
        let before = state(DisplayMode::Solid);
        let mut scene = SceneDescriptor::derive(&before, &style);

        let mut after = before.clone();
        after.mode = DisplayMode::Transparent;
        after.transparency_level = 0.25;
        scene.regenerate(DirtyFlags::OUTER | DirtyFlags::LINING | DirtyFlags::MESH, &after, &style);

        assert_eq!(scene, SceneDescriptor::derive(&after, &style));
    }
}
