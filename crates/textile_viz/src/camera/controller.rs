//! Eased camera moves between poses

use super::{CameraPose, CameraPreset};
use crate::foundation::math::utils;

/// Duration of reset, zoom-to-fit and preset moves
pub const DEFAULT_MOVE_DURATION_MS: u32 = 1000;

/// An in-flight move
#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraTransition {
    from: CameraPose,
    to: CameraPose,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl CameraTransition {
    /// Progress in [0, 1]; zero-length moves are complete immediately
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            utils::clamp(self.elapsed_ms / self.duration_ms, 0.0, 1.0)
        }
    }
}

/// Owner of the current, default and saved camera poses
///
/// A new move always starts from wherever the camera currently is, so it
/// preempts any move in flight instead of queueing behind it.
#[derive(Debug, Clone)]
pub struct CameraController {
    current: CameraPose,
    default_pose: CameraPose,
    saved: Option<CameraPose>,
    fit_fallback: CameraPose,
    move_duration_ms: u32,
    transition: Option<CameraTransition>,
}

impl CameraController {
    /// Create a controller sitting at `default_pose`
    pub fn new(default_pose: CameraPose, fit_fallback: CameraPose) -> Self {
        Self {
            current: default_pose,
            default_pose,
            saved: None,
            fit_fallback,
            move_duration_ms: DEFAULT_MOVE_DURATION_MS,
            transition: None,
        }
    }

    /// Override the duration used by reset, zoom-to-fit and presets
    pub fn with_move_duration(mut self, duration_ms: u32) -> Self {
        self.move_duration_ms = duration_ms;
        self
    }

    /// Current pose
    pub fn current(&self) -> CameraPose {
        self.current
    }

    /// Pose restored by [`reset_to_default`](Self::reset_to_default)
    pub fn default_pose(&self) -> CameraPose {
        self.default_pose
    }

    /// User-saved pose, if any
    pub fn saved(&self) -> Option<CameraPose> {
        self.saved
    }

    /// Whether a move is in flight
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Set the pose directly (orbit controls), cancelling any move
    pub fn set_current(&mut self, pose: CameraPose) {
        self.transition = None;
        self.current = pose;
    }

    /// Ease from the current pose to `pose` over `duration_ms`
    ///
    /// With a zero duration the next [`update`](Self::update) lands exactly
    /// on `pose`.
    pub fn move_to(&mut self, pose: CameraPose, duration_ms: u32) {
        if let Some(previous) = self.transition {
            log::debug!("Camera move to {:?} preempted", previous.to.position);
        }
        log::info!("Camera move to {:?} over {} ms", pose.position, duration_ms);
        self.transition = Some(CameraTransition {
            from: self.current,
            to: pose,
            duration_ms: duration_ms as f32,
            elapsed_ms: 0.0,
        });
    }

    /// Advance an in-flight move by `delta_seconds`
    ///
    /// Returns the new pose if the camera moved this frame.
    pub fn update(&mut self, delta_seconds: f32) -> Option<CameraPose> {
        let mut transition = self.transition?;
        transition.elapsed_ms += delta_seconds.max(0.0) * 1000.0;

        let progress = transition.progress();
        if progress >= 1.0 {
            self.current = transition.to;
            self.transition = None;
            log::debug!("Camera move complete");
        } else {
            self.current = transition.from.lerp(&transition.to, utils::ease_out_cubic(progress));
            self.transition = Some(transition);
        }

        log::trace!("Camera at {:?}", self.current.position);
        Some(self.current)
    }

    /// Make the current pose the new default
    pub fn save_current_as_default(&mut self) {
        self.default_pose = self.current;
        log::info!("Camera default pose saved");
    }

    /// Remember the current pose for zoom-to-fit
    pub fn save_current_as_user(&mut self) {
        self.saved = Some(self.current);
        log::info!("Camera user pose saved");
    }

    /// Ease back to the default pose
    pub fn reset_to_default(&mut self) {
        self.move_to(self.default_pose, self.move_duration_ms);
    }

    /// Ease to the saved pose, or the built-in framing when none is saved
    pub fn zoom_to_fit(&mut self) {
        let pose = self.saved.unwrap_or(self.fit_fallback);
        self.move_to(pose, self.move_duration_ms);
    }

    /// Ease to a named preset
    pub fn move_to_preset(&mut self, preset: CameraPreset) {
        self.move_to(preset.pose(), self.move_duration_ms);
    }
}
