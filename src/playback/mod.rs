//! Audio playback: decoding, transports and background loading.
//!
//! The visualizer only depends on the [`Transport`] contract. The device
//! transport plays through cpal; the offline transport advances one render
//! frame at a time for headless recording.

mod clip;
mod cursor;
mod loader;
mod offline;
mod player;

pub use clip::{is_audio_path, AudioClip};
pub use cursor::ClipCursor;
pub use loader::AudioLoader;
pub use offline::OfflineTransport;
pub use player::AudioPlayer;

use std::sync::Arc;

use crate::error::Result;
use crate::spectrum::SampleTap;

/// Playback control contract used by the visualizer
pub trait Transport {
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Halt playback and release the output
    fn stop(&mut self) -> Result<()>;

    /// Jump to `time_s` (clamped to the clip)
    fn seek(&mut self, time_s: f32);

    /// Set output volume (clamped to [0, 1])
    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    fn is_playing(&self) -> bool;

    /// Play head position (seconds)
    fn current_time(&self) -> f32;

    /// Clip length in seconds; NaN while unknown
    fn duration(&self) -> f32;

    /// Called once per rendered frame with the frame duration
    fn on_frame(&mut self, _frame_dt_s: f32) {}
}

/// A ready-to-play file handed to the visualizer
pub struct LoadedAudio {
    pub transport: Box<dyn Transport>,
    /// Samples played by `transport`, for spectrum analysis
    pub tap: SampleTap,
    pub title: String,
}

/// Builds a transport for a freshly decoded clip, writing into `tap`
pub type TransportFactory = Box<dyn FnMut(Arc<AudioClip>, SampleTap) -> Result<Box<dyn Transport>>>;

/// Factory for the default output device
pub fn device_transport() -> TransportFactory {
    Box::new(|clip, tap| Ok(Box::new(AudioPlayer::start(clip, tap)?) as Box<dyn Transport>))
}

/// Factory for frame-stepped offline playback
pub fn offline_transport() -> TransportFactory {
    Box::new(|clip, tap| Ok(Box::new(OfflineTransport::new(clip, tap)) as Box<dyn Transport>))
}
