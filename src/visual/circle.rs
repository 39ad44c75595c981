//! Concentric rings around the canvas centre.

use glam::Vec2;

use crate::canvas::{Canvas, Rgba, Stroke, Style};
use crate::params::CircleParams;
use crate::smoothing::lerp;
use crate::spectrum::SpectrumFeatures;

/// Which feature drives a ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingBand {
    Bass,
    Mid,
    Treble,
    /// Equal mix of all three bands
    Blend,
}

impl RingBand {
    /// Band for ring `index` of `count`, assigned inside-out by share
    pub fn for_ring(index: usize, count: usize, params: &CircleParams) -> Self {
        let n = count as f32;
        let bass_end = (n * params.bass_share).round() as usize;
        let mid_end = (n * (params.bass_share + params.mid_share)).round() as usize;
        let treble_end =
            (n * (params.bass_share + params.mid_share + params.treble_share)).round() as usize;

        if index < bass_end {
            RingBand::Bass
        } else if index < mid_end {
            RingBand::Mid
        } else if index < treble_end {
            RingBand::Treble
        } else {
            RingBand::Blend
        }
    }

    pub fn value(self, features: &SpectrumFeatures) -> f32 {
        match self {
            RingBand::Bass => features.bass,
            RingBand::Mid => features.mid,
            RingBand::Treble => features.treble,
            RingBand::Blend => features.band_average(),
        }
    }

    fn color_index(self) -> usize {
        match self {
            RingBand::Bass => 0,
            RingBand::Mid => 1,
            RingBand::Treble => 2,
            RingBand::Blend => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub band: RingBand,
    pub base_radius: f32,
    /// Smoothed
    pub radius: f32,
    /// Smoothed, 0-255
    pub opacity: f32,
}

/// Entity store for circle mode
#[derive(Debug, Clone)]
pub struct RingSet {
    rings: Vec<Ring>,
    bounds: Vec2,
}

impl RingSet {
    pub fn new(params: &CircleParams, bounds: Vec2) -> Self {
        let count = params.ring_count;
        let dim = bounds.min_element();
        let rings = (0..count)
            .map(|i| {
                let base_radius = Self::base_radius(i, count, dim, params);
                Ring {
                    band: RingBand::for_ring(i, count, params),
                    base_radius,
                    radius: base_radius,
                    opacity: 0.0,
                }
            })
            .collect();
        Self { rings, bounds }
    }

    /// Evenly spaced from the min to the max radius fraction of `dim`
    pub fn base_radius(index: usize, count: usize, dim: f32, params: &CircleParams) -> f32 {
        let t = if count > 1 {
            index as f32 / (count - 1) as f32
        } else {
            0.0
        };
        lerp(params.min_radius_fraction, params.max_radius_fraction, t) * dim
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Smooth every ring toward its target; invisible rings still update
    pub fn update(&mut self, features: &SpectrumFeatures, params: &CircleParams) {
        if self.rings.len() != params.ring_count {
            *self = Self::new(params, self.bounds);
        }
        let dim = self.bounds.min_element();
        let level = features.level;

        for (i, ring) in self.rings.iter_mut().enumerate() {
            let blend = ring.band.value(features);
            // Per-ring phase keeps neighbours from breathing in lockstep
            let phase = 0.5 + 0.5 * (i as f32 * params.phase_step).sin();
            let target_radius = ring.base_radius
                + blend * params.blend_radius_gain * dim
                + level * params.level_radius_gain * dim * phase;
            let target_opacity = (blend * level * params.opacity_scale).clamp(0.0, params.max_opacity);

            ring.radius = lerp(ring.radius, target_radius, params.blend);
            ring.opacity = lerp(ring.opacity, target_opacity, params.blend);
        }
    }

    /// Centre disc (diameter, opacity), recomputed every frame
    pub fn center_disc(level: f32, params: &CircleParams) -> (f32, f32) {
        let size = params.center_base_size + level * params.center_level_gain;
        let opacity = (params.center_base_opacity + level * params.center_opacity_gain).min(255.0);
        (size, opacity)
    }

    pub fn draw(&self, level: f32, canvas: &mut dyn Canvas, params: &CircleParams) {
        let center = self.bounds * 0.5;
        for ring in &self.rings {
            if ring.opacity <= params.visibility_threshold {
                continue;
            }
            let rgb = params.band_rgb[ring.band.color_index()];
            let stroke = Stroke::new(Rgba::rgb(rgb, 0).with_alpha(ring.opacity), params.stroke_width);
            canvas.ellipse(center, ring.radius * 2.0, &Style::stroked(stroke));
        }

        let (size, opacity) = Self::center_disc(level, params);
        canvas.ellipse(
            center,
            size,
            &Style::filled(Rgba::gray(255, 0).with_alpha(opacity)),
        );
    }

    pub fn render(&mut self, features: &SpectrumFeatures, canvas: &mut dyn Canvas, params: &CircleParams) {
        self.update(features, params);
        self.draw(features.level, canvas, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CommandRecorder;

    fn rings() -> (RingSet, CircleParams) {
        let params = CircleParams::default();
        (RingSet::new(&params, Vec2::new(800.0, 600.0)), params)
    }

    #[test]
    fn test_band_assignment() {
        let params = CircleParams::default();
        let bands: Vec<_> = (0..10).map(|i| RingBand::for_ring(i, 10, &params)).collect();
        assert_eq!(&bands[..3], &[RingBand::Bass; 3]);
        assert_eq!(&bands[3..5], &[RingBand::Mid; 2]);
        assert_eq!(&bands[5..7], &[RingBand::Treble; 2]);
        assert_eq!(&bands[7..], &[RingBand::Blend; 3]);
    }

    #[test]
    fn test_base_radii_span_smaller_side() {
        let (rings, params) = rings();
        let first = rings.rings()[0].base_radius;
        let last = rings.rings()[9].base_radius;
        assert!((first - 600.0 * params.min_radius_fraction).abs() < 1e-3);
        assert!((last - 600.0 * params.max_radius_fraction).abs() < 1e-3);
        assert!(rings.rings().windows(2).all(|w| w[0].base_radius < w[1].base_radius));
    }

    #[test]
    fn test_opacity_never_exceeds_cap() {
        let (mut rings, params) = rings();
        let loud = SpectrumFeatures::new(1.0, 1.0, 1.0, 1.0);
        for _ in 0..500 {
            rings.update(&loud, &params);
            assert!(rings.rings().iter().all(|r| r.opacity <= params.max_opacity));
        }
        assert!(rings.rings().iter().all(|r| r.opacity > 170.0));
    }

    #[test]
    fn test_silence_returns_rings_to_rest() {
        let (mut rings, params) = rings();
        for _ in 0..30 {
            rings.update(&SpectrumFeatures::new(0.8, 0.9, 0.7, 0.6), &params);
        }
        for _ in 0..400 {
            rings.update(&SpectrumFeatures::silent(), &params);
        }
        for ring in rings.rings() {
            assert!((ring.radius - ring.base_radius).abs() < 1e-2);
            assert!(ring.opacity < 1e-2);
        }
    }

    #[test]
    fn test_invisible_rings_update_but_do_not_draw() {
        let (mut rings, params) = rings();
        let mut canvas = CommandRecorder::new(800.0, 600.0);
        // Bass only: treble rings stay at zero opacity
        let features = SpectrumFeatures::new(0.5, 1.0, 0.0, 0.0);
        rings.render(&features, &mut canvas, &params);

        let treble = &rings.rings()[5];
        assert_eq!(treble.opacity, 0.0);
        assert!(treble.radius > treble.base_radius);

        // 3 bass rings + 3 blended rings + centre disc
        assert_eq!(canvas.ellipses().count(), 7);
    }

    #[test]
    fn test_center_disc() {
        let params = CircleParams::default();
        assert_eq!(RingSet::center_disc(0.0, &params), (12.0, 60.0));
        let (size, opacity) = RingSet::center_disc(0.5, &params);
        assert_eq!(size, 72.0);
        assert_eq!(opacity, 255.0);
    }

    #[test]
    fn test_ring_count_change_rebuilds() {
        let (mut rings, params) = rings();
        let fewer = CircleParams {
            ring_count: 4,
            ..params
        };
        rings.update(&SpectrumFeatures::silent(), &fewer);
        assert_eq!(rings.rings().len(), 4);
    }
}
