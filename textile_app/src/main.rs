//! Headless textile visualizer demo
//!
//! Drives the visualizer through a scripted sequence of UI interactions
//! against a renderer that logs what it receives and sweeps stem tubes the
//! way a GPU backend would before upload.
//!
//! Usage: `textile_demo [config.toml|config.ron]`

mod substrate;

use substrate::LoggingSubstrate;
use textile_viz::config::{Config, ConfigError, VisualizerConfig};
use textile_viz::foundation::{logging, time::FrameClock};
use textile_viz::{Visualizer, VisualizerError};
use thiserror::Error;

const FRAME_DELTA: f32 = 1.0 / 60.0;
const TOTAL_FRAMES: u32 = 600;

/// Application-level errors
#[derive(Error, Debug)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Visualizer error: {0}")]
    Visualizer(#[from] VisualizerError),

    #[error("Snapshot export failed: {0}")]
    Export(#[from] ron::Error),
}

/// One scripted UI interaction
fn apply_script_step(viz: &mut Visualizer, frame: u32) -> Result<(), VisualizerError> {
    match frame {
        30 => viz.set_base_color_hex("#3A7BD5")?,
        60 => viz.set_mode("transparent")?,
        75 => {
            viz.set_lining_enabled(true);
            viz.set_transparency_level(0.35);
        }
        90 => viz.set_circular_gradient(true),
        120 => viz.move_camera_to_preset("isometric")?,
        150 => {
            viz.set_multiple_stems(true);
            viz.set_stem_segment_count(12);
            viz.set_stem_offset(0.6);
        }
        200 => viz.set_mode("construction")?,
        240 => {
            viz.set_rotation_speed(1.2);
            viz.set_rotation(true);
        }
        300 => viz.set_mesh_inverted(true),
        330 => viz.set_theme(false),
        360 => {
            viz.save_camera_as_user();
            viz.move_camera_to_preset("cross-section")?;
        }
        420 => viz.zoom_to_fit(),
        480 => viz.set_gray_lining(true),
        540 => viz.reset_to_default_view(),
        _ => {}
    }
    Ok(())
}

fn run() -> Result<(), AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => VisualizerConfig::load_from_file(&path)?,
        None => VisualizerConfig::default(),
    };
    logging::init_with_level(&config.log_level);

    let mut viz = Visualizer::new(&config)?;
    viz.attach_substrate(Box::new(LoggingSubstrate::new()));

    let mut clock = FrameClock::new();
    for frame in 0..TOTAL_FRAMES {
        apply_script_step(&mut viz, frame)?;
        // Fixed step keeps runs reproducible; the clock only reports throughput
        let report = viz.frame(FRAME_DELTA);
        clock.tick();

        if report.frame % 120 == 0 {
            log::info!(
                "Frame {}: mode {}, rotation {:.2}, camera {:?}",
                report.frame,
                viz.mode(),
                report.rotation,
                viz.camera_pose().position
            );
        }
    }

    log::info!(
        "Ran {} frames at {:.0} fps (base {}, complement {})",
        clock.frame_count(),
        clock.average_fps(),
        viz.base_color(),
        viz.complementary_color()
    );

    let snapshot = ron::ser::to_string_pretty(&viz.snapshot(), ron::ser::PrettyConfig::default())?;
    println!("{}", snapshot);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("textile_demo: {}", err);
        std::process::exit(1);
    }
}
