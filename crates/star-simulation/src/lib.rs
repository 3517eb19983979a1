//! # Star Simulation
//!
//! Tick-driven lifecycle engine plus the small models that feed it: timeline,
//! parameter controls, rolling data history and the illustrative outcome
//! predictor.

pub mod controls;
pub mod history;
pub mod params;
pub mod predictor;
pub mod simulation;
pub mod timeline;

pub use controls::*;
pub use history::*;
pub use params::*;
pub use predictor::*;
pub use simulation::*;
pub use timeline::*;
