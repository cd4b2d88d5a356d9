//! Drawing surface abstraction
//!
//! The painter only needs three primitives. Any 2D backend (a browser canvas,
//! a software framebuffer, a display list) can implement them. Coordinates
//! are scene space: origin at the view center, +Y down.

use glam::Vec2;

use crate::color::Rgba;

pub trait Canvas {
    /// Fill a closed polygon (even-odd rule)
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Stroke the closed outline of a polygon
    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        points: Vec<Vec2>,
        color: Rgba,
    },
    StrokePolygon {
        points: Vec<Vec2>,
        width: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// Canvas that records commands for replay on another backend
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Replay everything onto `canvas`, in order
    pub fn replay<C: Canvas>(&self, canvas: &mut C) {
        for command in &self.commands {
            match command {
                DrawCommand::Fill { points, color } => canvas.fill_polygon(points, *color),
                DrawCommand::StrokePolygon {
                    points,
                    width,
                    color,
                } => canvas.stroke_polygon(points, *width, *color),
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    color,
                } => canvas.stroke_line(*from, *to, *width, *color),
            }
        }
    }
}

impl Canvas for DrawList {
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::Fill {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
