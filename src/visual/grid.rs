//! Reactive grid: a fixed partition of the canvas into square-ish cells.

use glam::Vec2;
use rand::Rng;

use crate::canvas::{Canvas, Rgba, Stroke, Style};
use crate::params::GridParams;
use crate::smoothing::{lerp, Smoothed};
use crate::spectrum::SpectrumFeatures;

/// One grid cell with its own smoothed band channels
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// (column, row)
    pub index: (usize, usize),
    pub top_left: Vec2,
    pub size: Vec2,
    /// Cell centre as a fraction of the grid, each axis in (0, 1)
    pub ratio: Vec2,
    /// Bass scaling for this cell's position
    pub bass_weight: f32,
    pub bass: Smoothed,
    pub mid: Smoothed,
    pub treble: Smoothed,
    /// Fixed at creation
    pub has_inner_box: bool,
}

impl GridCell {
    pub fn center(&self) -> Vec2 {
        self.top_left + self.size * 0.5
    }

    /// Combined intensity from the smoothed channels, scaled by level
    pub fn intensity(&self, level: f32) -> f32 {
        (self.bass.value + self.mid.value + self.treble.value) / 3.0 * level * 2.0
    }

    fn update(&mut self, features: &SpectrumFeatures, params: &GridParams) {
        let blend = params.channel_blend;
        self.bass
            .step_toward(features.bass * self.bass_weight, blend);
        self.mid.step_toward(features.mid * params.mid_gain, blend);
        self.treble
            .step_toward(features.treble * params.treble_gain, blend);
    }

    fn draw(&self, level: f32, canvas: &mut dyn Canvas, params: &GridParams) {
        let intensity = self.intensity(level);

        let stroke_alpha = 90.0 + 165.0 * intensity.min(1.0);
        let outline = Stroke::new(
            Rgba::rgb(params.stroke_rgb, 0).with_alpha(stroke_alpha),
            params.base_stroke + intensity * params.stroke_gain,
        );
        canvas.rect(self.top_left, self.size, &Style::stroked(outline));

        if !self.has_inner_box {
            return;
        }
        let fraction =
            (params.inner_base_fraction + intensity * params.inner_gain).min(params.inner_max_fraction);
        let inner = self.size * fraction;
        let share = params.inner_bass_share;
        let opacity = (self.bass.value * share + intensity.min(1.0) * (1.0 - share)) * 255.0;
        let fill = Rgba::rgb(params.inner_rgb, 0).with_alpha(opacity);
        canvas.rect(self.center() - inner * 0.5, inner, &Style::filled(fill));
    }
}

/// Entity store for grid mode
#[derive(Debug, Clone)]
pub struct CellGrid {
    cells: Vec<GridCell>,
    bounds: Vec2,
}

impl CellGrid {
    pub fn new(params: &GridParams, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let n = params.cells_per_side.max(1);
        let cell_size = bounds / n as f32;
        let probability = params.inner_box_probability.clamp(0.0, 1.0);

        let mut cells = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let ratio = Vec2::new(
                    (col as f32 + 0.5) / n as f32,
                    (row as f32 + 0.5) / n as f32,
                );
                cells.push(GridCell {
                    index: (col, row),
                    top_left: Vec2::new(col as f32, row as f32) * cell_size,
                    size: cell_size,
                    ratio,
                    bass_weight: Self::bass_weight(ratio, params),
                    bass: Smoothed::default(),
                    mid: Smoothed::default(),
                    treble: Smoothed::default(),
                    has_inner_box: rng.random_bool(probability),
                });
            }
        }
        Self { cells, bounds }
    }

    /// Bass scaling for a cell centred at `ratio`.
    ///
    /// Depends on the distance to the nearest grid edge, so it peaks at the
    /// central cells and falls off ring by ring toward the border.
    pub fn bass_weight(ratio: Vec2, params: &GridParams) -> f32 {
        let to_edge = ratio
            .x
            .min(1.0 - ratio.x)
            .min(ratio.y)
            .min(1.0 - ratio.y)
            .clamp(0.0, 0.5);
        lerp(params.bass_edge_weight, params.bass_center_weight, to_edge / 0.5)
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn update(&mut self, features: &SpectrumFeatures, params: &GridParams) {
        for cell in &mut self.cells {
            cell.update(features, params);
        }
    }

    pub fn draw(&self, level: f32, canvas: &mut dyn Canvas, params: &GridParams) {
        for cell in &self.cells {
            cell.draw(level, canvas, params);
        }
    }

    pub fn render(&mut self, features: &SpectrumFeatures, canvas: &mut dyn Canvas, params: &GridParams) {
        self.update(features, params);
        self.draw(features.level, canvas, params);
    }
}
