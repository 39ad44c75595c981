//! Particle network: drifting points joined by distance-faded lines.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::canvas::{Canvas, Rgba, Stroke, Style};
use crate::params::NetworkParams;
use crate::smoothing::{lerp, map_range};

const POINTER_RGB: [u8; 3] = [0, 255, 255];

/// A network point
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub pos: Vec2,
    /// Base velocity (pixels per frame); only its signs change after creation
    pub vel: Vec2,
    /// Base diameter
    pub size: f32,
    pub filled: bool,
    /// Smoothed diameter
    pub pulse: f32,
    /// Smoothed opacity of the last line drawn from this point
    pub line_opacity: f32,
    /// Smoothed opacity of the pointer line to this point
    pub pointer_line_opacity: f32,
}

impl Point {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, filled: bool) -> Self {
        Self {
            pos,
            vel,
            size,
            filled,
            pulse: size,
            line_opacity: 0.0,
            pointer_line_opacity: 0.0,
        }
    }

    fn random(params: &NetworkParams, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let pos = Vec2::new(
            rng.random_range(0.0..bounds.x.max(1.0)),
            rng.random_range(0.0..bounds.y.max(1.0)),
        );
        let direction = Vec2::from_angle(rng.random_range(0.0..TAU));
        let vel = direction * rng.random_range(params.speed_range.clone());
        let size = rng.random_range(params.size_range.clone());
        let filled = rng.random_bool(params.filled_probability.clamp(0.0, 1.0));
        Self::new(pos, vel, size, filled)
    }

    fn reset_smoothing(&mut self) {
        self.pulse = self.size;
        self.line_opacity = 0.0;
        self.pointer_line_opacity = 0.0;
    }
}

/// Reverse `vel` when `pos` has left `[0, max]` and is still heading away.
///
/// A point that is already returning is left alone, so each crossing flips
/// the sign exactly once.
fn reflect_axis(pos: f32, vel: &mut f32, max: f32) -> bool {
    if (pos < 0.0 && *vel < 0.0) || (pos > max && *vel > 0.0) {
        *vel = -*vel;
        true
    } else {
        false
    }
}

/// Entity store for network mode
#[derive(Debug, Clone)]
pub struct NetworkField {
    points: Vec<Point>,
    bounds: Vec2,
    /// Smoothed pointer disc diameter
    pointer_pulse: f32,
}

impl NetworkField {
    pub fn new(params: &NetworkParams, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let points = (0..params.point_count)
            .map(|_| Point::random(params, bounds, &mut *rng))
            .collect();
        Self::from_points(points, bounds, params)
    }

    /// Build from explicit points
    pub fn from_points(points: Vec<Point>, bounds: Vec2, params: &NetworkParams) -> Self {
        Self {
            points,
            bounds,
            pointer_pulse: params.pointer_base_size,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn pointer_pulse(&self) -> f32 {
        self.pointer_pulse
    }

    /// Move every point to the same relative position on a new canvas.
    ///
    /// Positions are clamped into the new bounds and smoothed values restart
    /// from their defaults.
    pub fn resize(&mut self, new_bounds: Vec2, params: &NetworkParams) {
        let old = self.bounds.max(Vec2::ONE);
        for point in &mut self.points {
            point.pos = (point.pos / old * new_bounds).clamp(Vec2::ZERO, new_bounds);
            point.reset_smoothing();
        }
        self.bounds = new_bounds;
        self.pointer_pulse = params.pointer_base_size;
    }

    /// Advance motion and pulse for one frame
    pub fn update(&mut self, level: f32, params: &NetworkParams) {
        let speed_boost = 1.0 + level * params.speed_boost;
        for p in &mut self.points {
            // Displacement blends base toward boosted velocity; the stored
            // velocity itself keeps its magnitude.
            let boosted = p.vel * speed_boost;
            p.pos += p.vel.lerp(boosted, params.velocity_blend);

            reflect_axis(p.pos.x, &mut p.vel.x, self.bounds.x);
            reflect_axis(p.pos.y, &mut p.vel.y, self.bounds.y);

            let target_size = p.size * (1.0 + level * params.pulse_gain);
            p.pulse = lerp(p.pulse, target_size, params.pulse_blend);
        }
    }

    pub fn draw_points(&self, canvas: &mut dyn Canvas, params: &NetworkParams) {
        let color = Rgba::gray(params.point_gray, params.point_opacity);
        let outline = Style::stroked(Stroke::new(color, 1.0));
        for p in &self.points {
            let style = if p.filled {
                outline.with_fill(color)
            } else {
                outline
            };
            canvas.ellipse(p.pos, p.pulse, &style);
        }
    }

    /// Draw a line for every pair closer than the level-scaled threshold.
    ///
    /// Opacity fades linearly from near to floor across the threshold and is
    /// smoothed on the first point of each pair.
    pub fn draw_connections(&mut self, level: f32, canvas: &mut dyn Canvas, params: &NetworkParams) {
        let threshold = params.connect_distance(level);
        let n = self.points.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.points[i].pos;
                let b = self.points[j].pos;
                let d = a.distance(b);
                if d >= threshold {
                    continue;
                }
                let target = map_range(
                    d,
                    0.0,
                    threshold,
                    params.line_opacity_near,
                    params.line_opacity_floor,
                );
                let source = &mut self.points[i];
                source.line_opacity = lerp(source.line_opacity, target, params.line_blend);

                let color = Rgba::gray(params.point_gray, 0).with_alpha(source.line_opacity);
                canvas.line(a, b, &Stroke::new(color, params.line_width));
            }
        }
    }

    /// Pointer disc and pointer-to-point lines, drawn only inside the canvas
    pub fn draw_pointer(
        &mut self,
        pointer: Vec2,
        level: f32,
        canvas: &mut dyn Canvas,
        params: &NetworkParams,
    ) {
        let inside = pointer.x >= 0.0
            && pointer.y >= 0.0
            && pointer.x < self.bounds.x
            && pointer.y < self.bounds.y;
        if !inside {
            return;
        }

        let target = params.pointer_base_size + level * params.pointer_level_gain;
        self.pointer_pulse = lerp(self.pointer_pulse, target, params.pointer_blend);
        let disc = Style::stroked(Stroke::new(Rgba::rgb(POINTER_RGB, 180), 1.0))
            .with_fill(Rgba::rgb(POINTER_RGB, 80));
        canvas.ellipse(pointer, self.pointer_pulse, &disc);

        let threshold = params.connect_distance(level);
        for p in &mut self.points {
            let d = pointer.distance(p.pos);
            if d >= threshold {
                continue;
            }
            let target = map_range(d, 0.0, threshold, params.line_opacity_near, 0.0);
            p.pointer_line_opacity = lerp(p.pointer_line_opacity, target, params.pointer_blend);
            let color = Rgba::rgb(POINTER_RGB, 0).with_alpha(p.pointer_line_opacity);
            canvas.line(pointer, p.pos, &Stroke::new(color, params.line_width));
        }
    }

    /// Full network frame: motion, points, connections, then pointer overlay
    pub fn render(
        &mut self,
        level: f32,
        pointer: Option<Vec2>,
        canvas: &mut dyn Canvas,
        params: &NetworkParams,
    ) {
        self.update(level, params);
        self.draw_points(canvas, params);
        self.draw_connections(level, canvas, params);
        if let Some(pointer) = pointer {
            self.draw_pointer(pointer, level, canvas, params);
        }
    }
}
