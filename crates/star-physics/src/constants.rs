//! Tuning constants for the lifecycle visualization
//!
//! None of these are physical. Time is in billions of years, mass in solar
//! masses, lengths in screen points.

/// Upper bound of the simulated time axis (Gyr)
pub const MAX_TIME: f32 = 12.0;

/// Stage clock breakpoints (Gyr). Each value is the inclusive start of the
/// next stage.
pub const PROTOSTAR_START: f32 = 0.5;
pub const MAIN_SEQUENCE_START: f32 = 2.0;
pub const RED_SUPERGIANT_START: f32 = 8.0;
pub const SUPERNOVA_START: f32 = 11.9;
pub const FINAL_START: f32 = 11.99;

/// Size of the star at reference mass with a stage multiplier of 1
pub const BASE_SIZE: f32 = 150.0;

/// Mass at which the size and orbital speed scale factors are 1
pub const REFERENCE_MASS: f32 = 20.0;

/// Fraction of the remaining distance to the target size covered per tick
pub const SIZE_SMOOTHING: f32 = 0.1;

/// Transition progress gained per tick (full transition after 50 ticks)
pub const TRANSITION_STEP: f32 = 0.02;

/// Default number of orbiting particles
pub const PARTICLE_COUNT: usize = 150;

/// Angular step per tick at unit speed and reference mass (radians)
pub const ANGULAR_STEP: f32 = 0.02;

/// Per-particle, per-tick probability of being replaced by a fresh particle
pub const PARTICLE_REPLACE_PROBABILITY: f64 = 0.01;

// Particle sampling ranges
pub const ANGULAR_SPEED_MIN: f32 = 0.5;
pub const ANGULAR_SPEED_MAX: f32 = 2.0;
pub const ORBIT_RADIUS_MIN_FACTOR: f32 = 0.8;
pub const ORBIT_RADIUS_MAX_FACTOR: f32 = 2.5;
pub const RENDER_SIZE_MIN: f32 = 2.0;
pub const RENDER_SIZE_MAX: f32 = 6.0;
pub const OPACITY_MIN: f32 = 0.3;
pub const OPACITY_MAX: f32 = 1.0;

/// Mass range offered by the parameter controls (solar masses)
pub const MASS_MIN: f32 = 8.0;
pub const MASS_MAX: f32 = 50.0;
pub const DEFAULT_MASS: f32 = 20.0;

/// Metallicity range offered by the parameter controls (Z)
pub const METALLICITY_MIN: f32 = 0.001;
pub const METALLICITY_MAX: f32 = 0.03;
pub const DEFAULT_METALLICITY: f32 = 0.02;
