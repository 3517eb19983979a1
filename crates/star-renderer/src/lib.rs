//! # Star Renderer
//!
//! Backend-agnostic drawing for the lifecycle visualizer. Everything is
//! expressed as filled circles on a [`Canvas`]; the application maps that onto
//! egui shapes for display and onto a [`PixelCanvas`] for frame capture.

pub mod background;
pub mod canvas;
pub mod pixel_canvas;
pub mod star_renderer;

pub use background::*;
pub use canvas::*;
pub use pixel_canvas::*;
pub use star_renderer::*;
