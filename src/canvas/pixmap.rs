//! tiny-skia raster canvas

use glam::Vec2;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use super::{Canvas, Rgba, Stroke, Style};
use crate::error::{Result, VisualizerError};

/// Software canvas backed by a tiny-skia pixmap
pub struct PixmapCanvas {
    pixmap: Pixmap,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width.max(1), height.max(1)).ok_or_else(|| {
            VisualizerError::Render(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        Ok(Self { pixmap })
    }

    /// Reallocate for a new size (contents are discarded)
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.width() == width.max(1) && self.height() == height.max(1) {
            return Ok(());
        }
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// RGBA8 bytes, row-major.
    ///
    /// Pixels are premultiplied; every frame starts from an opaque clear so
    /// they are also valid straight-alpha RGBA.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Color at a pixel, if inside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgba::new(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    fn paint(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint
    }

    fn skia_stroke(stroke: &Stroke) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: stroke.width.max(0.0),
            ..Default::default()
        }
    }

    fn draw_path(&mut self, path: &tiny_skia::Path, style: &Style) {
        if let Some(fill) = style.fill.filter(|c| c.a > 0) {
            self.pixmap.fill_path(
                path,
                &Self::paint(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if let Some(stroke) = style.stroke.filter(|s| s.color.a > 0 && s.width > 0.0) {
            self.pixmap.stroke_path(
                path,
                &Self::paint(stroke.color),
                &Self::skia_stroke(&stroke),
                Transform::identity(),
                None,
            );
        }
    }
}

impl Canvas for PixmapCanvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    fn clear(&mut self, color: Rgba) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn ellipse(&mut self, center: Vec2, diameter: f32, style: &Style) {
        let Some(path) = PathBuilder::from_circle(center.x, center.y, diameter * 0.5) else {
            return;
        };
        self.draw_path(&path, style);
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        if stroke.color.a == 0 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let Some(path) = pb.finish() else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &Self::paint(stroke.color),
            &Self::skia_stroke(stroke),
            Transform::identity(),
            None,
        );
    }

    fn rect(&mut self, top_left: Vec2, size: Vec2, style: &Style) {
        let Some(rect) = Rect::from_xywh(top_left.x, top_left.y, size.x, size.y) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        self.draw_path(&path, style);
    }
}
