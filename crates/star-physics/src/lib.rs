//! # Star Physics
//!
//! Data model for the stellar lifecycle visualizer: lifecycle stages and their
//! palettes, the stage clock, decorative particles, and tuning constants.

pub mod color;
pub mod constants;
pub mod particle;
pub mod stage;

pub use color::*;
pub use constants::*;
pub use particle::*;
pub use stage::*;
