//! [`Canvas`] backed by egui shapes, painted on the background layer

use egui::{Color32, Shape};
use glam::Vec2;
use star_physics::Rgba;
use star_renderer::Canvas;

/// Collects filled circles as egui shapes in logical points
pub struct ShapeCanvas {
    size: Vec2,
    shapes: Vec<Shape>,
}

impl ShapeCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            shapes: Vec::with_capacity(1024),
        }
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

impl Canvas for ShapeCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 || color.a == 0 {
            return;
        }
        self.shapes.push(Shape::circle_filled(
            egui::pos2(center.x, center.y),
            radius,
            Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a),
        ));
    }
}
