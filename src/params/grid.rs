//! Reactive grid parameters.

/// Grid mode parameters
#[derive(Debug, Clone)]
pub struct GridParams {
    /// Cells per side (the canvas is split into cells_per_side²)
    pub cells_per_side: usize,

    /// Smoothing factor for the bass/mid/treble channels
    pub channel_blend: f32,

    /// Probability that a cell carries an inner box (fixed at init)
    pub inner_box_probability: f64,

    /// Bass scaling at the outermost cells
    pub bass_edge_weight: f32,

    /// Bass scaling at the grid centre
    pub bass_center_weight: f32,

    /// Mid energy gain (uniform across cells)
    pub mid_gain: f32,

    /// Treble energy gain (uniform across cells)
    pub treble_gain: f32,

    /// Outer square stroke width at zero intensity (pixels)
    pub base_stroke: f32,

    /// Extra stroke width per unit combined intensity
    pub stroke_gain: f32,

    /// Inner box size at zero intensity (fraction of the cell)
    pub inner_base_fraction: f32,

    /// Inner box growth per unit combined intensity (fraction of the cell)
    pub inner_gain: f32,

    /// Largest inner box (fraction of the cell)
    pub inner_max_fraction: f32,

    /// Weight of the bass channel in inner box opacity (rest is combined intensity)
    pub inner_bass_share: f32,

    /// Outer stroke color (RGB)
    pub stroke_rgb: [u8; 3],

    /// Inner box fill color (RGB)
    pub inner_rgb: [u8; 3],
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            cells_per_side: 10,
            channel_blend: 0.1,
            inner_box_probability: 0.4,
            bass_edge_weight: 0.4,
            bass_center_weight: 1.6,
            mid_gain: 1.0,
            treble_gain: 1.2,
            base_stroke: 0.5,
            stroke_gain: 4.0,
            inner_base_fraction: 0.1,
            inner_gain: 0.8,
            inner_max_fraction: 0.9,
            inner_bass_share: 0.75,
            stroke_rgb: [150, 160, 220],
            inner_rgb: [255, 120, 90],
        }
    }
}
