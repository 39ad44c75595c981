//! Concentric ring parameters.

/// Circle mode parameters
#[derive(Debug, Clone)]
pub struct CircleParams {
    /// Number of concentric rings
    pub ring_count: usize,

    /// Innermost base radius (fraction of the smaller canvas side)
    pub min_radius_fraction: f32,

    /// Outermost base radius (fraction of the smaller canvas side)
    pub max_radius_fraction: f32,

    /// Fraction of rings (from the centre) driven by bass
    pub bass_share: f32,

    /// Fraction of rings driven by mid, after the bass rings
    pub mid_share: f32,

    /// Fraction of rings driven by treble, after the mid rings
    /// Remaining rings use an equal blend of all three bands
    pub treble_share: f32,

    /// Radius added per unit blend value (fraction of the smaller canvas side)
    pub blend_radius_gain: f32,

    /// Radius added per unit level (fraction of the smaller canvas side)
    pub level_radius_gain: f32,

    /// Phase step between neighbouring rings (radians)
    pub phase_step: f32,

    /// Opacity per unit of blend × level, before clamping
    pub opacity_scale: f32,

    /// Opacity ceiling (0-255)
    pub max_opacity: f32,

    /// Rings at or below this smoothed opacity are not drawn
    pub visibility_threshold: f32,

    /// Smoothing factor for ring radius and opacity
    pub blend: f32,

    /// Ring stroke width (pixels)
    pub stroke_width: f32,

    /// Centre disc diameter at zero level (pixels)
    pub center_base_size: f32,

    /// Centre disc diameter gain per unit level (pixels)
    pub center_level_gain: f32,

    /// Centre disc opacity at zero level (0-255)
    pub center_base_opacity: f32,

    /// Centre disc opacity gain per unit level
    pub center_opacity_gain: f32,

    /// Ring colors by band: bass, mid, treble, blended (RGB)
    pub band_rgb: [[u8; 3]; 4],
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            ring_count: 10,
            min_radius_fraction: 0.05,
            max_radius_fraction: 0.42,
            bass_share: 0.3,
            mid_share: 0.2,
            treble_share: 0.2,
            blend_radius_gain: 0.06,
            level_radius_gain: 0.04,
            phase_step: 0.7,
            opacity_scale: 900.0,
            max_opacity: 180.0,
            visibility_threshold: 1.0,
            blend: 0.18,
            stroke_width: 2.0,
            center_base_size: 12.0,
            center_level_gain: 120.0,
            center_base_opacity: 60.0,
            center_opacity_gain: 400.0,
            band_rgb: [
                [255, 90, 80],   // bass
                [120, 230, 140], // mid
                [90, 160, 255],  // treble
                [230, 230, 230], // blended
            ],
        }
    }
}
