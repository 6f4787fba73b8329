//! Stateless diagram description produced by each lab's renderer
//!
//! Shapes are outlines in world units; the host decides how to rasterize them.

use glam::Vec2;

pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const FRAME: Color = [0.75, 0.75, 0.8, 1.0];
    pub const BEAM: Color = [0.9, 0.8, 0.5, 1.0];
    pub const LOAD: Color = [0.4, 0.7, 1.0, 1.0];
    pub const HOT: Color = [1.0, 0.35, 0.2, 1.0];
    pub const COLD: Color = [0.25, 0.5, 1.0, 1.0];
    pub const BOB: Color = [0.95, 0.95, 0.3, 1.0];
    pub const GUIDE: Color = [0.5, 0.5, 0.5, 0.4];
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line { from: Vec2, to: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Rect { min: Vec2, max: Vec2, color: Color },
    Polyline { points: Vec<Vec2>, color: Color },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub shapes: Vec<Shape>,
    /// Region the camera should keep in view
    pub bounds: (Vec2, Vec2),
}

impl Diagram {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            shapes: Vec::new(),
            bounds: (min, max),
        }
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color) -> &mut Self {
        self.shapes.push(Shape::Line { from, to, color });
        self
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) -> &mut Self {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
        });
        self
    }

    pub fn rect(&mut self, min: Vec2, max: Vec2, color: Color) -> &mut Self {
        self.shapes.push(Shape::Rect { min, max, color });
        self
    }

    pub fn polyline(&mut self, points: Vec<Vec2>, color: Color) -> &mut Self {
        self.shapes.push(Shape::Polyline { points, color });
        self
    }

    pub fn center(&self) -> Vec2 {
        (self.bounds.0 + self.bounds.1) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.bounds.1 - self.bounds.0
    }
}
