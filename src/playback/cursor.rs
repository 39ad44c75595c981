//! Playback position, volume and play state over a clip.

use std::sync::Arc;

use super::AudioClip;

/// Play head over an [`AudioClip`], shared by the device and offline transports
#[derive(Debug, Clone)]
pub struct ClipCursor {
    clip: Arc<AudioClip>,
    position_frames: f64,
    playing: bool,
    volume: f32,
}

impl ClipCursor {
    pub fn new(clip: Arc<AudioClip>) -> Self {
        Self {
            clip,
            position_frames: 0.0,
            playing: false,
            volume: 1.0,
        }
    }

    pub fn clip(&self) -> &Arc<AudioClip> {
        &self.clip
    }

    fn at_end(&self) -> bool {
        self.position_frames >= self.clip.frames() as f64
    }

    /// Start or resume; a finished clip restarts from the beginning
    pub fn play(&mut self) {
        if self.at_end() {
            self.position_frames = 0.0;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Halt and rewind
    pub fn stop(&mut self) {
        self.playing = false;
        self.position_frames = 0.0;
    }

    /// Jump to `time_s`, clamped to the clip
    pub fn seek(&mut self, time_s: f32) {
        let time_s = if time_s.is_finite() { time_s } else { 0.0 };
        let clamped = time_s.clamp(0.0, self.clip.duration_s());
        self.position_frames = clamped as f64 * self.clip.sample_rate_hz() as f64;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time(&self) -> f32 {
        (self.position_frames / self.clip.sample_rate_hz() as f64) as f32
    }

    pub fn duration(&self) -> f32 {
        self.clip.duration_s()
    }

    /// Fill interleaved `out` (with `out_channels` channels at `out_rate_hz`)
    /// from the play head, appending each played frame's post-volume mono
    /// mix to `mono`. Silence is written while paused or past the end.
    pub fn render(
        &mut self,
        out: &mut [f32],
        out_channels: usize,
        out_rate_hz: u32,
        mono: &mut Vec<f32>,
    ) {
        let out_channels = out_channels.max(1);
        let step = self.clip.sample_rate_hz() as f64 / out_rate_hz.max(1) as f64;

        for frame in out.chunks_mut(out_channels) {
            if !self.playing {
                frame.fill(0.0);
                continue;
            }
            if self.at_end() {
                // Reaching the end behaves like stop-at-end: not playing, head parked
                self.playing = false;
                self.position_frames = self.clip.frames() as f64;
                frame.fill(0.0);
                continue;
            }

            let index = self.position_frames as usize;
            for (channel, slot) in frame.iter_mut().enumerate() {
                *slot = self.clip.sample(index, channel) * self.volume;
            }
            mono.push(self.clip.mono(index) * self.volume);
            self.position_frames += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_clip() -> Arc<AudioClip> {
        // 1 second, mono, 10 Hz sample rate
        Arc::new(AudioClip::from_samples(
            (0..10).map(|i| i as f32 / 10.0).collect(),
            1,
            10,
            "ramp",
        ))
    }

    #[test]
    fn test_paused_cursor_renders_silence() {
        let mut cursor = ClipCursor::new(ramp_clip());
        let mut out = [1.0; 4];
        let mut mono = Vec::new();
        cursor.render(&mut out, 2, 10, &mut mono);
        assert_eq!(out, [0.0; 4]);
        assert!(mono.is_empty());
        assert_eq!(cursor.current_time(), 0.0);
    }

    #[test]
    fn test_render_advances_and_applies_volume() {
        let mut cursor = ClipCursor::new(ramp_clip());
        cursor.set_volume(0.5);
        cursor.seek(0.2);
        cursor.play();

        let mut out = [0.0; 4];
        let mut mono = Vec::new();
        cursor.render(&mut out, 2, 10, &mut mono);

        assert_eq!(out, [0.1, 0.1, 0.15, 0.15]);
        assert_eq!(mono, vec![0.1, 0.15]);
        assert!((cursor.current_time() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_end_of_clip_stops_playback() {
        let mut cursor = ClipCursor::new(ramp_clip());
        cursor.play();
        let mut out = vec![0.0; 12];
        let mut mono = Vec::new();
        cursor.render(&mut out, 1, 10, &mut mono);
        assert!(!cursor.is_playing());
        assert_eq!(mono.len(), 10);
        assert_eq!(&out[10..], &[0.0, 0.0]);

        // Playing again restarts from the top
        cursor.play();
        assert_eq!(cursor.current_time(), 0.0);
    }

    #[test]
    fn test_seek_and_volume_are_clamped() {
        let mut cursor = ClipCursor::new(ramp_clip());
        cursor.seek(99.0);
        assert_eq!(cursor.current_time(), 1.0);
        cursor.seek(-3.0);
        assert_eq!(cursor.current_time(), 0.0);
        cursor.seek(f32::NAN);
        assert_eq!(cursor.current_time(), 0.0);

        cursor.set_volume(4.0);
        assert_eq!(cursor.volume(), 1.0);
        cursor.set_volume(f32::NAN);
        assert_eq!(cursor.volume(), 1.0);
    }

    #[test]
    fn test_resamples_by_position_step() {
        let mut cursor = ClipCursor::new(ramp_clip());
        cursor.play();
        let mut out = [0.0; 4];
        let mut mono = Vec::new();
        // Device at twice the clip rate: each clip frame is played twice
        cursor.render(&mut out, 1, 20, &mut mono);
        assert_eq!(out, [0.0, 0.0, 0.1, 0.1]);
        assert!((cursor.current_time() - 0.2).abs() < 1e-6);
    }
}
