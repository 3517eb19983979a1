//! Mass and metallicity inputs with their allowed ranges

use std::ops::RangeInclusive;

use rand::Rng;
use star_physics::{
    sample_uniform, DEFAULT_MASS, DEFAULT_METALLICITY, MASS_MAX, MASS_MIN, METALLICITY_MAX,
    METALLICITY_MIN,
};

/// Values are kept inside their ranges and rounded to three decimals, so the
/// engine only ever sees what the sliders can display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterControls {
    mass: f32,
    metallicity: f32,
}

impl Default for ParameterControls {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            metallicity: DEFAULT_METALLICITY,
        }
    }
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

impl ParameterControls {
    pub const MASS_RANGE: RangeInclusive<f32> = MASS_MIN..=MASS_MAX;
    pub const METALLICITY_RANGE: RangeInclusive<f32> = METALLICITY_MIN..=METALLICITY_MAX;

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn metallicity(&self) -> f32 {
        self.metallicity
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = round3(mass.clamp(MASS_MIN, MASS_MAX));
    }

    pub fn set_metallicity(&mut self, metallicity: f32) {
        self.metallicity = round3(metallicity.clamp(METALLICITY_MIN, METALLICITY_MAX));
    }

    /// Pick a random star inside the allowed ranges
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set_mass(sample_uniform(rng, MASS_MIN, MASS_MAX));
        self.set_metallicity(sample_uniform(rng, METALLICITY_MIN, METALLICITY_MAX));
    }
}
