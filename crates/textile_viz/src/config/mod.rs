//! Configuration system
//!
//! Startup settings for the visualizer: the initial display state, fixed
//! styling, camera poses and logging. Files are TOML or RON, chosen by
//! extension.

pub use serde::{Deserialize, Serialize};

use crate::camera::{CameraPose, DEFAULT_MOVE_DURATION_MS};
use crate::color::Color;
use crate::render::scene::{SceneStyle, ThemePalette};
use crate::render::stem::{MAX_STEM_SEGMENTS, MIN_STEM_SEGMENTS};
use crate::state::DisplayState;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but is unusable
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Camera startup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Duration of reset, fit and preset moves
    pub move_duration_ms: u32,
    /// Pose at startup and target of camera reset
    pub default_pose: CameraPose,
    /// Zoom-to-fit target when no pose has been saved
    pub fit_pose: CameraPose,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_duration_ms: DEFAULT_MOVE_DURATION_MS,
            default_pose: CameraPose::default(),
            fit_pose: CameraPose::new([0.0, 0.5, 4.5], [0.0, 0.0, 0.0]),
        }
    }
}

/// Top-level visualizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Gray used for tonal linings
    pub lining_gray: Color,
    /// Display state at startup
    pub display: DisplayState,
    /// Theme colors
    pub palette: ThemePalette,
    /// Camera settings
    pub camera: CameraConfig,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            lining_gray: SceneStyle::default().lining_gray,
            display: DisplayState::default(),
            palette: ThemePalette::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for VisualizerConfig {}

impl VisualizerConfig {
    /// Styling inputs for scene derivation
    pub fn style(&self) -> SceneStyle {
        SceneStyle {
            lining_gray: self.lining_gray,
            palette: self.palette,
        }
    }

    /// Check values that parse but make no sense
    ///
    /// Slightly out-of-range display values are not errors here; the state
    /// machine clamps them like any other input.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!("log level '{}'", self.log_level)));
        }

        let display = &self.display;
        let numbers = [
            ("display.transparency_level", display.transparency_level),
            ("display.rotation_speed", display.rotation_speed),
            ("display.stem_max_offset", display.stem_max_offset),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite", name)));
        }

        if !(MIN_STEM_SEGMENTS..=MAX_STEM_SEGMENTS).contains(&display.stem_segment_count) {
            return Err(ConfigError::Invalid(format!(
                "display.stem_segment_count must be in {}..={}",
                MIN_STEM_SEGMENTS, MAX_STEM_SEGMENTS
            )));
        }

        let poses = [
            ("camera.default_pose", &self.camera.default_pose),
            ("camera.fit_pose", &self.camera.fit_pose),
        ];
        for (name, pose) in poses {
            if !pose.position.iter().chain(pose.target.iter()).all(|v| v.is_finite()) {
                return Err(ConfigError::Invalid(format!("{} must be finite", name)));
            }
            if pose.distance() <= f32::EPSILON {
                return Err(ConfigError::Invalid(format!("{} position equals its target", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DisplayMode;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VisualizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r##"
            log_level = "debug"
            lining_gray = "#707070"

            [display]
            mode = "transparent"
            base_color = "#00A8CC"
            transparency_level = 0.3
        "##;
        let config: VisualizerConfig = toml::from_str(text).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.lining_gray, Color::new(0x70, 0x70, 0x70));
        assert_eq!(config.display.mode, DisplayMode::Transparent);
        assert_eq!(config.display.base_color, Color::new(0x00, 0xA8, 0xCC));
        assert_eq!(config.display.stem_segment_count, DisplayState::default().stem_segment_count);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_bad_mode_fails_to_parse() {
        let text = "[display]\nmode = \"xray\"\n";
        assert!(toml::from_str::<VisualizerConfig>(text).is_err());
    }

    #[test]
    fn test_ron_roundtrip() {
        let mut config = VisualizerConfig::default();
        config.display.dark_theme = false;
        config.camera.move_duration_ms = 250;
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: VisualizerConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = VisualizerConfig::default();
        config.log_level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = VisualizerConfig::default();
        config.display.transparency_level = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = VisualizerConfig::default();
        config.camera.fit_pose = CameraPose::new([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_stem_count_range() {
        let mut config = VisualizerConfig::default();
        for count in [0, MIN_STEM_SEGMENTS - 1, MAX_STEM_SEGMENTS + 1] {
            config.display.stem_segment_count = count;
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
        for count in [MIN_STEM_SEGMENTS, MAX_STEM_SEGMENTS] {
            config.display.stem_segment_count = count;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let result = VisualizerConfig::load_from_file("settings.yaml");
        // Missing file is reported before the extension check
        assert!(matches!(result, Err(ConfigError::Io(_))));

        let result = VisualizerConfig::default().save_to_file("/nonexistent-dir/settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
