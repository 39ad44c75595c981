//! Error types shared across the visualizer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the per-frame path (loading, device setup, config)
#[derive(Debug, Error)]
pub enum VisualizerError {
    /// The selected file is not an audio file
    #[error("not an audio file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// The audio file could not be decoded
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    /// Audio could not be written (recording)
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// Decoded audio contains no playable frames
    #[error("{} contains no audio frames", .0.display())]
    EmptyClip(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no audio output device found")]
    NoOutputDevice,

    /// Output stream construction or control failed
    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// GPU or frame-capture failure
    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
