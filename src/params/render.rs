//! Canvas, playback and recording configuration.

use std::path::PathBuf;

/// Canvas configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial canvas width (pixels)
    pub canvas_width: u32,

    /// Initial canvas height (pixels)
    pub canvas_height: u32,

    /// Background gray level (0-255), cleared every frame
    pub background_gray: u8,

    /// Target frame rate (FPS), also the offline transport step
    pub fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 800,
            background_gray: 25,
            fps: 60,
        }
    }
}

impl RenderConfig {
    /// Duration of a single frame (seconds)
    pub fn frame_duration_s(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Transport control configuration
#[derive(Debug, Clone)]
pub struct PlaybackParams {
    /// Volume applied when a file finishes loading (0-1)
    pub initial_volume: f32,

    /// Seek step for keyboard scrubbing (seconds)
    pub seek_step_s: f32,

    /// Volume step for keyboard control
    pub volume_step: f32,

    /// Smoothing factor for the progress percentage
    pub progress_blend: f32,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            seek_step_s: 5.0,
            volume_step: 0.1,
            progress_blend: 0.1,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil().max(0.0) as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of a single captured frame
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame_num))
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_paths() {
        let config = RecordingConfig::new(2.5);
        assert_eq!(config.total_frames(), 150);
        assert_eq!(
            config.frame_path(7),
            PathBuf::from("recording/frames/frame_00007.png")
        );
        assert_eq!(config.audio_path(), PathBuf::from("recording/audio.wav"));
    }

    #[test]
    fn test_frame_duration() {
        let config = RenderConfig::default();
        assert!((config.frame_duration_s() - 1.0 / 60.0).abs() < 1e-6);
    }
}
