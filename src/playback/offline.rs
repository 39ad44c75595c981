//! Frame-stepped playback without an output device.

use std::sync::Arc;

use super::{AudioClip, ClipCursor, Transport};
use crate::error::Result;
use crate::spectrum::SampleTap;

/// Advances the play head by one render frame per `on_frame` call and feeds
/// the played samples to the tap, as a device would in real time.
pub struct OfflineTransport {
    cursor: ClipCursor,
    tap: SampleTap,
    /// Fractional frames carried between calls
    carry: f64,
    scratch: Vec<f32>,
    mono: Vec<f32>,
}

impl OfflineTransport {
    pub fn new(clip: Arc<AudioClip>, tap: SampleTap) -> Self {
        Self {
            cursor: ClipCursor::new(clip),
            tap,
            carry: 0.0,
            scratch: Vec::new(),
            mono: Vec::new(),
        }
    }
}

impl Transport for OfflineTransport {
    fn play(&mut self) -> Result<()> {
        self.cursor.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.cursor.pause();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.cursor.stop();
        self.carry = 0.0;
        Ok(())
    }

    fn seek(&mut self, time_s: f32) {
        self.cursor.seek(time_s);
        self.tap.clear();
        self.carry = 0.0;
    }

    fn set_volume(&mut self, volume: f32) {
        self.cursor.set_volume(volume);
    }

    fn volume(&self) -> f32 {
        self.cursor.volume()
    }

    fn is_playing(&self) -> bool {
        self.cursor.is_playing()
    }

    fn current_time(&self) -> f32 {
        self.cursor.current_time()
    }

    fn duration(&self) -> f32 {
        self.cursor.duration()
    }

    fn on_frame(&mut self, frame_dt_s: f32) {
        if !self.cursor.is_playing() || frame_dt_s <= 0.0 {
            return;
        }
        let clip = Arc::clone(self.cursor.clip());
        let rate = clip.sample_rate_hz();
        let channels = clip.channels() as usize;

        let exact = frame_dt_s as f64 * rate as f64 + self.carry;
        let frames = exact.floor() as usize;
        self.carry = exact - frames as f64;

        self.scratch.clear();
        self.scratch.resize(frames * channels, 0.0);
        self.mono.clear();
        self.cursor
            .render(&mut self.scratch, channels, rate, &mut self.mono);
        self.tap.push_slice(&self.mono);
    }
}
