//! Immediate-mode 2D drawing surface used by the visual modes.

mod pixmap;
mod recorder;

pub use pixmap::PixmapCanvas;
pub use recorder::{CommandRecorder, DrawCommand};

use glam::Vec2;

/// 8-bit RGBA color with straight alpha
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(value: u8, a: u8) -> Self {
        Self::new(value, value, value, a)
    }

    pub const fn rgb(rgb: [u8; 3], a: u8) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], a)
    }

    /// Same color with an opacity given as a float in 0-255 (clamped)
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 255.0).round() as u8,
            ..self
        }
    }
}

/// Outline paint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

/// Paint for closed shapes: optional outline and optional fill
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    pub stroke: Option<Stroke>,
    pub fill: Option<Rgba>,
}

impl Style {
    pub fn stroked(stroke: Stroke) -> Self {
        Self {
            stroke: Some(stroke),
            fill: None,
        }
    }

    pub fn filled(color: Rgba) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
        }
    }

    pub fn with_fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Drawing surface
pub trait Canvas {
    /// Surface size in pixels
    fn size(&self) -> Vec2;

    /// Fill the whole surface
    fn clear(&mut self, color: Rgba);

    /// Circle/ellipse with equal axes, given by centre and diameter
    fn ellipse(&mut self, center: Vec2, diameter: f32, style: &Style);

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);

    /// Axis-aligned rectangle given by its top-left corner
    fn rect(&mut self, top_left: Vec2, size: Vec2, style: &Style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_clamps() {
        let c = Rgba::gray(220, 0);
        assert_eq!(c.with_alpha(300.0).a, 255);
        assert_eq!(c.with_alpha(-5.0).a, 0);
        assert_eq!(c.with_alpha(99.6).a, 100);
    }
}
