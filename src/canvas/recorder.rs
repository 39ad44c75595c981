//! Canvas that records draw calls instead of rasterizing them.

use glam::Vec2;

use super::{Canvas, Rgba, Stroke, Style};

/// A single recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Ellipse {
        center: Vec2,
        diameter: f32,
        style: Style,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Rect {
        top_left: Vec2,
        size: Vec2,
        style: Style,
    },
}

/// Records draw calls for inspection
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded line segments as (from, to, stroke)
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, &Stroke)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line { from, to, stroke } => Some((*from, *to, stroke)),
            _ => None,
        })
    }

    /// Recorded ellipses as (center, diameter, style)
    pub fn ellipses(&self) -> impl Iterator<Item = (Vec2, f32, &Style)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Ellipse {
                center,
                diameter,
                style,
            } => Some((*center, *diameter, style)),
            _ => None,
        })
    }

    /// Recorded rectangles as (top_left, size, style)
    pub fn rects(&self) -> impl Iterator<Item = (Vec2, Vec2, &Style)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Rect {
                top_left,
                size,
                style,
            } => Some((*top_left, *size, style)),
            _ => None,
        })
    }
}

impl Canvas for CommandRecorder {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn ellipse(&mut self, center: Vec2, diameter: f32, style: &Style) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            diameter,
            style: *style,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn rect(&mut self, top_left: Vec2, size: Vec2, style: &Style) {
        self.commands.push(DrawCommand::Rect {
            top_left,
            size,
            style: *style,
        });
    }
}
