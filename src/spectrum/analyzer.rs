//! FFT spectrum analysis and RMS level measurement.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use tracing::debug;

use super::{Band, SampleTap, SpectrumSource};
use crate::error::Result;
use crate::params::AnalyzerConfig;

/// Spectrum analyzer reading from a [`SampleTap`].
///
/// Magnitudes are smoothed across frames in the linear domain, converted to
/// decibels and scaled to bytes (0-255) over the configured dB range. Band
/// energies average the bins inside each band's Hz range.
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    input: Option<SampleTap>,
    sample_rate_hz: u32,
    history: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bins: Vec<f32>,
    level: f32,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| hann_window(i, config.fft_size))
            .collect();
        let bin_count = config.bin_count();

        Ok(Self {
            fft,
            window,
            input: None,
            sample_rate_hz: 44100,
            history: vec![0.0; config.history_len()],
            fft_buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; bin_count],
            bins: vec![0.0; bin_count],
            level: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Sample history the attached transport should retain
    pub fn history_len(&self) -> usize {
        self.config.history_len()
    }

    fn reset(&mut self) {
        self.smoothed.fill(0.0);
        self.bins.fill(0.0);
        self.level = 0.0;
    }

    fn magnitude_to_byte(&self, magnitude: f32) -> f32 {
        if magnitude <= 0.0 {
            return 0.0;
        }
        let db = 20.0 * magnitude.log10();
        let span = self.config.max_decibels - self.config.min_decibels;
        (255.0 * (db - self.config.min_decibels) / span).clamp(0.0, 255.0)
    }
}

impl SpectrumSource for SpectrumAnalyzer {
    fn set_input(&mut self, tap: SampleTap) {
        self.sample_rate_hz = tap.sample_rate_hz();
        debug!(
            "Analyzer input attached: {} Hz, {} bins",
            self.sample_rate_hz,
            self.config.bin_count()
        );
        self.input = Some(tap);
        self.reset();
    }

    fn analyze_spectrum(&mut self) -> &[f32] {
        let Some(tap) = &self.input else {
            return &self.bins;
        };
        self.sample_rate_hz = tap.sample_rate_hz();
        tap.copy_latest(&mut self.history);

        // Apply Hann window to the newest fft_size samples
        let fft_size = self.config.fft_size;
        let start = self.history.len() - fft_size;
        for (i, slot) in self.fft_buffer.iter_mut().enumerate() {
            *slot = Complex::new(self.history[start + i] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.fft_buffer);

        let tau = self.config.smoothing;
        for k in 0..self.bins.len() {
            let magnitude = self.fft_buffer[k].norm() / fft_size as f32;
            self.smoothed[k] = tau * self.smoothed[k] + (1.0 - tau) * magnitude;
        }
        for k in 0..self.bins.len() {
            let byte = self.magnitude_to_byte(self.smoothed[k]);
            self.bins[k] = byte;
        }

        let level_start = self.history.len() - self.config.level_window;
        let rms = rms(&self.history[level_start..]);
        let s = self.config.level_smoothing;
        self.level = (s * self.level + (1.0 - s) * rms).clamp(0.0, 1.0);

        &self.bins
    }

    fn overall_level(&self) -> f32 {
        self.level
    }

    fn band_energy(&self, band: Band) -> f32 {
        let range_hz = match band {
            Band::Bass => self.config.bass_range_hz,
            Band::Mid => self.config.mid_range_hz,
            Band::Treble => self.config.treble_range_hz,
        };
        let bins = self.config.bins_for(range_hz, self.sample_rate_hz);
        let count = bins.clone().count();
        if count == 0 {
            return 0.0;
        }
        let total: f32 = self.bins[bins].iter().sum();
        (total / count as f32 / 255.0).clamp(0.0, 1.0)
    }
}

/// Root mean square of a sample block
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
