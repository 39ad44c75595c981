//! Playback progress readout (smoothed position bar and time labels).

use crate::playback::Transport;
use crate::smoothing::lerp;

/// Format seconds as `m:ss`
pub fn format_time(seconds: f32) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let m = (seconds / 60.0).floor() as u32;
    let s = (seconds % 60.0).floor() as u32;
    format!("{}:{:02}", m, s)
}

/// Progress state shown by the shell
#[derive(Debug, Clone, Default)]
pub struct ProgressDisplay {
    /// Smoothed position in percent (0-100)
    pub percent: f32,
    pub current_label: String,
    pub duration_label: String,
}

impl ProgressDisplay {
    /// Move toward the transport's position.
    ///
    /// Skipped while the duration is not yet known (NaN) or not positive;
    /// the next frame simply tries again. Returns whether anything changed.
    pub fn update(&mut self, transport: &dyn Transport, blend: f32) -> bool {
        let current = transport.current_time();
        let total = transport.duration();
        if !total.is_finite() || total <= 0.0 {
            return false;
        }

        let target = (current / total * 100.0).clamp(0.0, 100.0);
        self.percent = lerp(self.percent, target, blend);
        self.current_label = format_time(current);
        self.duration_label = format_time(total);
        true
    }

    /// Clear the readout (new file)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    struct FakeTransport {
        time: f32,
        duration: f32,
    }

    impl Transport for FakeTransport {
        fn play(&mut self) -> Result<()> {
            Ok(())
        }
        fn pause(&mut self) -> Result<()> {
            Ok(())
        }
        fn stop(&mut self) -> Result<()> {
            Ok(())
        }
        fn seek(&mut self, time_s: f32) {
            self.time = time_s;
        }
        fn set_volume(&mut self, _volume: f32) {}
        fn volume(&self) -> f32 {
            1.0
        }
        fn is_playing(&self) -> bool {
            true
        }
        fn current_time(&self) -> f32 {
            self.time
        }
        fn duration(&self) -> f32 {
            self.duration
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(f32::NAN), "0:00");
    }

    #[test]
    fn test_unknown_duration_is_skipped() {
        let mut progress = ProgressDisplay::default();
        let transport = FakeTransport {
            time: 3.0,
            duration: f32::NAN,
        };
        assert!(!progress.update(&transport, 0.1));
        assert_eq!(progress.percent, 0.0);
        assert!(progress.duration_label.is_empty());
    }

    #[test]
    fn test_progress_is_smoothed() {
        let mut progress = ProgressDisplay::default();
        let transport = FakeTransport {
            time: 50.0,
            duration: 100.0,
        };
        assert!(progress.update(&transport, 0.1));
        assert!((progress.percent - 5.0).abs() < 1e-4);
        assert_eq!(progress.current_label, "0:50");
        assert_eq!(progress.duration_label, "1:40");
    }

    #[test]
    fn test_reset_clears_readout() {
        let mut progress = ProgressDisplay::default();
        let transport = FakeTransport {
            time: 30.0,
            duration: 60.0,
        };
        progress.update(&transport, 1.0);
        assert_eq!(progress.percent, 50.0);

        progress.reset();
        assert_eq!(progress.percent, 0.0);
        assert!(progress.current_label.is_empty());
        assert!(progress.duration_label.is_empty());
    }
}
