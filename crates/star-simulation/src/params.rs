//! Engine parameters for runtime tuning

use star_physics::{
    BASE_SIZE, PARTICLE_COUNT, PARTICLE_REPLACE_PROBABILITY, REFERENCE_MASS, SIZE_SMOOTHING,
    TRANSITION_STEP,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    /// Number of particles in the field; fixed for the engine's lifetime
    pub particle_count: usize,
    /// Star size at reference mass with a stage multiplier of 1
    pub base_size: f32,
    /// Mass at which size and orbit speed are unscaled
    pub reference_mass: f32,
    /// First-order smoothing factor applied to the displayed size each tick
    pub size_smoothing: f32,
    /// Transition progress gained per tick
    pub transition_step: f32,
    /// Per-particle, per-tick replacement probability
    pub replace_probability: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            base_size: BASE_SIZE,
            reference_mass: REFERENCE_MASS,
            size_smoothing: SIZE_SMOOTHING,
            transition_step: TRANSITION_STEP,
            replace_probability: PARTICLE_REPLACE_PROBABILITY,
        }
    }
}

impl SimulationParams {
    pub fn with_particle_count(mut self, particle_count: usize) -> Self {
        self.particle_count = particle_count;
        self
    }
}
