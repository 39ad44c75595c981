//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::params::{RecordingConfig, VisualizerConfig};
use crate::visual::Mode;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "vibescope")]
#[command(about = "Audio-reactive visualizer with network, grid and circle modes", long_about = None)]
pub struct Args {
    /// Audio file to load at startup (files can also be dropped on the window)
    #[arg(long, short, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Visual mode: network (default), grid, circle
    #[arg(long, short, value_name = "MODE", default_value = "network")]
    pub mode: String,

    /// Canvas width in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Number of network points
    #[arg(long, value_name = "N")]
    pub points: Option<usize>,

    /// Seed for entity placement (random if omitted)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Initial playback volume (0-1)
    #[arg(long, value_name = "V")]
    pub volume: Option<f32>,

    /// Record frames and audio headlessly (duration in seconds); needs --file
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse the mode name, falling back to network
    pub fn parse_mode(&self) -> Mode {
        match self.mode.parse::<Mode>() {
            Ok(mode) => mode,
            Err(e) => {
                warn!("{}, using network", e);
                Mode::Network
            }
        }
    }

    /// Fold command-line overrides into the default configuration
    pub fn into_config(&self) -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.render.canvas_width = self.width;
        config.render.canvas_height = self.height;
        config.seed = self.seed;
        if let Some(points) = self.points {
            config.network.point_count = points;
        }
        if let Some(volume) = self.volume {
            config.playback.initial_volume = volume.clamp(0.0, 1.0);
        }
        config
    }

    /// Recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(RecordingConfig::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_fold_into_config() {
        let args = Args::parse_from([
            "vibescope",
            "--mode",
            "circle",
            "--width",
            "640",
            "--points",
            "60",
            "--seed",
            "9",
            "--volume",
            "1.5",
            "-vv",
        ]);
        assert_eq!(args.parse_mode(), Mode::Circle);
        assert_eq!(args.verbose, 2);

        let config = args.into_config();
        assert_eq!(config.render.canvas_width, 640);
        assert_eq!(config.render.canvas_height, 800);
        assert_eq!(config.network.point_count, 60);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.playback.initial_volume, 1.0);
        assert!(args.recording_config().is_none());
    }

    #[test]
    fn test_unknown_mode_falls_back_to_network() {
        let args = Args::parse_from(["vibescope", "--mode", "spiral"]);
        assert_eq!(args.parse_mode(), Mode::Network);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert!(Args::try_parse_from(["vibescope", "--width", "0"]).is_err());
    }
}
