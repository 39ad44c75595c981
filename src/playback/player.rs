//! Device playback through cpal.

use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, info, warn};

use super::{AudioClip, ClipCursor, Transport};
use crate::error::{Result, VisualizerError};
use crate::spectrum::SampleTap;

/// Plays a clip on the default output device
pub struct AudioPlayer {
    /// Play head shared with the audio callback
    cursor: Arc<Mutex<ClipCursor>>,

    /// History fed by the callback, cleared on seek
    tap: SampleTap,

    /// Audio output stream (kept alive)
    stream: cpal::Stream,
}

/// Initial room in the callback's mono scratch buffer
const CALLBACK_SCRATCH_FRAMES: usize = 8192;

/// One device callback: fill `data` from the cursor and feed the played
/// mono mix to `tap`. `mono` is scratch space reused across callbacks.
fn fill_device_buffer(
    cursor: &Mutex<ClipCursor>,
    data: &mut [f32],
    channels: usize,
    rate_hz: u32,
    mono: &mut Vec<f32>,
    tap: &SampleTap,
) {
    mono.clear();
    match cursor.lock() {
        Ok(mut cursor) => cursor.render(data, channels, rate_hz, mono),
        Err(_) => data.fill(0.0),
    }
    if !mono.is_empty() {
        tap.push_slice(mono);
    }
}

impl AudioPlayer {
    /// Open the default output device and start a (silent) stream for `clip`
    pub fn start(clip: Arc<AudioClip>, tap: SampleTap) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(VisualizerError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| VisualizerError::Stream(format!("failed to get audio config: {}", e)))?;

        let channels = config.channels() as usize;
        let rate_hz = config.sample_rate().0;
        info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            rate_hz,
            channels
        );

        // The callback plays one sample per device frame, so the analyzer
        // must see the device rate rather than the clip's
        if tap.sample_rate_hz() != rate_hz {
            debug!(
                "Relabelling sample tap from {} Hz to device rate {} Hz",
                tap.sample_rate_hz(),
                rate_hz
            );
            tap.set_sample_rate_hz(rate_hz);
        }

        let cursor = Arc::new(Mutex::new(ClipCursor::new(clip)));
        let cursor_cb = Arc::clone(&cursor);
        let tap_cb = tap.clone();
        let mut mono = Vec::with_capacity(CALLBACK_SCRATCH_FRAMES);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill_device_buffer(&cursor_cb, data, channels, rate_hz, &mut mono, &tap_cb);
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| VisualizerError::Stream(format!("failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| VisualizerError::Stream(format!("failed to start audio stream: {}", e)))?;

        Ok(Self { cursor, tap, stream })
    }

    fn cursor(&self) -> MutexGuard<'_, ClipCursor> {
        self.cursor.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for AudioPlayer {
    fn play(&mut self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| VisualizerError::Stream(format!("failed to resume stream: {}", e)))?;
        self.cursor().play();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.cursor().pause();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.cursor().stop();
        self.stream
            .pause()
            .map_err(|e| VisualizerError::Stream(format!("failed to pause stream: {}", e)))
    }

    fn seek(&mut self, time_s: f32) {
        self.cursor().seek(time_s);
        self.tap.clear();
    }

    fn set_volume(&mut self, volume: f32) {
        self.cursor().set_volume(volume);
    }

    fn volume(&self) -> f32 {
        self.cursor().volume()
    }

    fn is_playing(&self) -> bool {
        self.cursor().is_playing()
    }

    fn current_time(&self) -> f32 {
        self.cursor().current_time()
    }

    fn duration(&self) -> f32 {
        self.cursor().duration()
    }
}
