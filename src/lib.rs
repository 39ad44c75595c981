//! Vibescope library - audio-reactive visualizer core
//!
//! Spectrum features drive three interchangeable modes (particle network,
//! reactive grid, concentric rings). Every animated value eases toward a
//! per-frame target, so the picture never jumps.

pub mod canvas;
pub mod cli;
pub mod error;
pub mod logging;
pub mod params;
pub mod playback;
pub mod progress;
pub mod recording;
pub mod rendering;
pub mod smoothing;
pub mod spectrum;
pub mod visual;
pub mod visualizer;

pub use error::{Result, VisualizerError};
pub use visual::Mode;
pub use visualizer::Visualizer;
