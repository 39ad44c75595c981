//! Visual modes and their entity stores.
//!
//! Each mode owns its entities and exposes a single `render` step that
//! updates every smoothed value from the frame's spectrum features and
//! then draws.

mod circle;
mod grid;
mod network;

pub use circle::{Ring, RingBand, RingSet};
pub use grid::{CellGrid, GridCell};
pub use network::{NetworkField, Point};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Visualizer mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Drifting points linked by distance-faded lines
    #[default]
    Network,
    /// Square grid of bass/mid/treble reactive cells
    Grid,
    /// Concentric rings pulsing per band
    Circle,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Network, Mode::Grid, Mode::Circle];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Network => "network",
            Mode::Grid => "grid",
            Mode::Circle => "circle",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown visualizer mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "network" => Ok(Mode::Network),
            "grid" => Ok(Mode::Grid),
            "circle" => Ok(Mode::Circle),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>(), Ok(mode));
        }
        assert_eq!(" Grid ".parse::<Mode>(), Ok(Mode::Grid));
        assert_eq!(
            "spiral".parse::<Mode>(),
            Err(UnknownMode("spiral".to_string()))
        );
    }
}
