//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants live here with:
//! - Units (pixels, pixels per frame, 0-255 opacity, Hz)
//! - Documented ranges and meanings
//! - Defaults tuned for an 800x800 canvas at 60 FPS

mod audio;
mod circle;
mod grid;
mod network;
mod render;

// Re-export all types
pub use audio::AnalyzerConfig;
pub use circle::CircleParams;
pub use grid::GridParams;
pub use network::NetworkParams;
pub use render::{PlaybackParams, RecordingConfig, RenderConfig};

/// Complete visualizer configuration
#[derive(Debug, Clone, Default)]
pub struct VisualizerConfig {
    pub analyzer: AnalyzerConfig,
    pub network: NetworkParams,
    pub grid: GridParams,
    pub circle: CircleParams,
    pub render: RenderConfig,
    pub playback: PlaybackParams,
    /// Seed for entity initialization (None = OS entropy)
    pub seed: Option<u64>,
}
