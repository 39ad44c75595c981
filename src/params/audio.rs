//! Spectrum analysis configuration with frequency band mappings.

use std::ops::RangeInclusive;

use crate::error::{Result, VisualizerError};

/// Spectrum analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT window size in samples (must be power of 2, bins = fft_size / 2)
    pub fft_size: usize,

    /// Spectral smoothing time constant in [0, 1)
    /// 0.9 = each frame keeps 90% of the previous magnitude
    pub smoothing: f32,

    /// Magnitude mapped to byte value 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte value 255 (dBFS)
    pub max_decibels: f32,

    /// Bass frequency range (Hz)
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// Treble frequency range (Hz)
    pub treble_range_hz: (f32, f32),

    /// Samples used for the RMS level measurement
    pub level_window: usize,

    /// Smoothing applied to the RMS level in [0, 1)
    pub level_smoothing: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 256, // 128 bins
            smoothing: 0.9,
            min_decibels: -100.0,
            max_decibels: -30.0,
            bass_range_hz: (20.0, 140.0),
            mid_range_hz: (400.0, 2600.0),
            treble_range_hz: (5200.0, 14000.0),
            level_window: 1024,
            level_smoothing: 0.0,
        }
    }
}

impl AnalyzerConfig {
    /// Number of magnitude bins produced per analysis
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert frequency (Hz) to the nearest bin index for a given sample rate
    pub fn hz_to_bin(&self, hz: f32, sample_rate_hz: u32) -> usize {
        let nyquist = sample_rate_hz as f32 / 2.0;
        let index = (hz / nyquist * self.bin_count() as f32).round();
        (index.max(0.0) as usize).min(self.bin_count().saturating_sub(1))
    }

    /// Inclusive bin range covering `range_hz`
    pub fn bins_for(&self, range_hz: (f32, f32), sample_rate_hz: u32) -> RangeInclusive<usize> {
        self.hz_to_bin(range_hz.0, sample_rate_hz)..=self.hz_to_bin(range_hz.1, sample_rate_hz)
    }

    /// Size of the sample history the analyzer needs
    pub fn history_len(&self) -> usize {
        self.fft_size.max(self.level_window)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 2 {
            return Err(VisualizerError::InvalidConfig(format!(
                "FFT size must be a power of 2, got {}",
                self.fft_size
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing) || !(0.0..1.0).contains(&self.level_smoothing) {
            return Err(VisualizerError::InvalidConfig(
                "smoothing must be in [0, 1)".to_string(),
            ));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(VisualizerError::InvalidConfig(format!(
                "decibel range is empty: {}..{}",
                self.min_decibels, self.max_decibels
            )));
        }
        for (name, (lo, hi)) in [
            ("bass", self.bass_range_hz),
            ("mid", self.mid_range_hz),
            ("treble", self.treble_range_hz),
        ] {
            if lo < 0.0 || lo > hi {
                return Err(VisualizerError::InvalidConfig(format!(
                    "{} range is inverted: {}..{} Hz",
                    name, lo, hi
                )));
            }
        }
        if self.level_window == 0 {
            return Err(VisualizerError::InvalidConfig(
                "level window must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_bin() {
        let config = AnalyzerConfig::default();

        // 128 bins over 22050 Hz ≈ 172 Hz per bin
        assert_eq!(config.hz_to_bin(0.0, 44100), 0);
        assert_eq!(config.hz_to_bin(172.3, 44100), 1);
        assert_eq!(config.hz_to_bin(22050.0, 44100), 127);
        assert_eq!(config.hz_to_bin(96000.0, 44100), 127);
    }

    #[test]
    fn test_band_bins_ordered() {
        let config = AnalyzerConfig::default();
        let bass = config.bins_for(config.bass_range_hz, 44100);
        let mid = config.bins_for(config.mid_range_hz, 44100);
        let treble = config.bins_for(config.treble_range_hz, 44100);

        assert!(bass.end() <= mid.start());
        assert!(mid.end() <= treble.start());
        assert!(*treble.end() < config.bin_count());
    }

    #[test]
    fn test_validate() {
        assert!(AnalyzerConfig::default().validate().is_ok());

        let config = AnalyzerConfig {
            fft_size: 300,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            smoothing: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            mid_range_hz: (3000.0, 100.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
