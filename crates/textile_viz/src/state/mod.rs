//! # Display State
//!
//! The single source of truth for what the visualizer shows, and the state
//! machine that mutates it.

mod display;

pub use display::{DirtyFlags, DisplayMode, DisplayState, DisplayStateMachine, RotationState};

use thiserror::Error;

/// Display state errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Mode name did not match any display mode
    #[error("Unknown display mode: '{0}' (expected construction, transparent or solid)")]
    UnknownMode(String),
}
