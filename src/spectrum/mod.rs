//! Spectrum features consumed by the visual modes, and the source contract
//! that produces them once per frame.

mod analyzer;
mod tap;

pub use analyzer::SpectrumAnalyzer;
pub use tap::SampleTap;

/// Frequency band selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Bass,
    Mid,
    Treble,
}

/// Per-frame audio features, each normalized to [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpectrumFeatures {
    /// Overall amplitude (RMS)
    pub level: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

impl SpectrumFeatures {
    pub fn new(level: f32, bass: f32, mid: f32, treble: f32) -> Self {
        Self {
            level,
            bass,
            mid,
            treble,
        }
        .clamped()
    }

    /// Idle state: no audio, every target defaults to zero
    pub fn silent() -> Self {
        Self::default()
    }

    /// Clamp every feature into [0, 1]; NaN becomes 0
    pub fn clamped(self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Self {
            level: unit(self.level),
            bass: unit(self.bass),
            mid: unit(self.mid),
            treble: unit(self.treble),
        }
    }

    pub fn band(&self, band: Band) -> f32 {
        match band {
            Band::Bass => self.bass,
            Band::Mid => self.mid,
            Band::Treble => self.treble,
        }
    }

    /// Equal blend of the three bands
    pub fn band_average(&self) -> f32 {
        (self.bass + self.mid + self.treble) / 3.0
    }
}

/// Produces spectrum features from the audio currently playing
pub trait SpectrumSource {
    /// Attach the analyzer to a playback's sample tap
    fn set_input(&mut self, tap: SampleTap);

    /// Refresh and return the magnitude bins (0-255), once per frame
    fn analyze_spectrum(&mut self) -> &[f32];

    /// Overall level from the most recent analysis, in [0, 1]
    fn overall_level(&self) -> f32;

    /// Band energy from the most recent analysis, in [0, 1]
    fn band_energy(&self, band: Band) -> f32;

    /// Analyze and collect all features for this frame
    fn features(&mut self) -> SpectrumFeatures {
        self.analyze_spectrum();
        SpectrumFeatures::new(
            self.overall_level(),
            self.band_energy(Band::Bass),
            self.band_energy(Band::Mid),
            self.band_energy(Band::Treble),
        )
    }
}
