//! Drawing surface abstraction

use glam::Vec2;
use star_physics::Rgba;

/// Anything the render pass can draw filled circles onto.
///
/// Coordinates are in surface units with the origin at the top-left corner and
/// y pointing down. Surfaces that rasterize skip circles with a non-positive
/// or NaN radius.
pub trait Canvas {
    /// Width and height of the surface
    fn size(&self) -> Vec2;

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Viewport centre, snapped to whole units
    fn center(&self) -> Vec2 {
        (self.size() / 2.0).floor()
    }
}

/// Records every call instead of drawing. Used to test render passes.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub size: Vec2,
    pub circles: Vec<(Vec2, f32, Rgba)>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            circles: Vec::new(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circles.push((center, radius, color));
    }
}
