//! Illustrative end-state classifier
//!
//! This is a toy. It fits a one-split decision stump on a synthetic mass grid
//! labelled by a textbook threshold, so its "confidence" says nothing about
//! real stars. Metallicity is accepted for interface symmetry and ignored: the
//! synthetic labels never depend on it.

use std::fmt;

use star_physics::{MASS_MAX, MASS_MIN};

/// Number of synthetic training masses spread evenly over the control range
const TRAINING_SAMPLES: usize = 100;

/// Stars heavier than this are labelled as black hole progenitors
const BLACK_HOLE_LABEL_MASS: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinalOutcome {
    WhiteDwarf,
    NeutronStar,
    BlackHole,
}

impl FinalOutcome {
    pub fn label(self) -> &'static str {
        match self {
            FinalOutcome::WhiteDwarf => "White Dwarf",
            FinalOutcome::NeutronStar => "Neutron Star",
            FinalOutcome::BlackHole => "Black Hole",
        }
    }
}

impl fmt::Display for FinalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub outcome: FinalOutcome,
    /// Percentage in `[0, 100]`
    pub confidence: f32,
    /// Percentage in `[0, 100]`
    pub neutron_star_probability: f32,
    /// Percentage in `[0, 100]`
    pub black_hole_probability: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomePredictor {
    split_mass: f32,
}

impl Default for OutcomePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomePredictor {
    /// Fit the stump: the split sits halfway between the heaviest sample
    /// labelled neutron star and the lightest labelled black hole.
    pub fn new() -> Self {
        let step = (MASS_MAX - MASS_MIN) / (TRAINING_SAMPLES - 1) as f32;
        let masses = (0..TRAINING_SAMPLES).map(|i| MASS_MIN + i as f32 * step);

        let (heaviest_light, lightest_heavy) = masses.fold(
            (f32::NEG_INFINITY, f32::INFINITY),
            |(light, heavy), m| {
                if m > BLACK_HOLE_LABEL_MASS {
                    (light, heavy.min(m))
                } else {
                    (light.max(m), heavy)
                }
            },
        );

        let split_mass = (heaviest_light + lightest_heavy) / 2.0;
        log::debug!("OutcomePredictor: split at {split_mass:.3} solar masses");

        Self { split_mass }
    }

    /// Mass at which the prediction flips from neutron star to black hole
    pub fn split_mass(&self) -> f32 {
        self.split_mass
    }

    pub fn predict(&self, mass: f32, _metallicity: f32) -> Prediction {
        if mass < MASS_MIN {
            return Prediction {
                outcome: FinalOutcome::WhiteDwarf,
                confidence: 100.0,
                neutron_star_probability: 0.0,
                black_hole_probability: 0.0,
            };
        }

        // Both leaves of the stump are pure, so the winning class always
        // carries the full probability mass.
        if mass <= self.split_mass {
            Prediction {
                outcome: FinalOutcome::NeutronStar,
                confidence: 100.0,
                neutron_star_probability: 100.0,
                black_hole_probability: 0.0,
            }
        } else {
            Prediction {
                outcome: FinalOutcome::BlackHole,
                confidence: 100.0,
                neutron_star_probability: 0.0,
                black_hole_probability: 100.0,
            }
        }
    }
}

/// Familiar name for a star of the given mass
pub fn star_class(mass: f32) -> &'static str {
    if mass > 40.0 {
        "Wolf-Rayet Star"
    } else if mass > 30.0 {
        "Blue Hypergiant"
    } else if mass > 20.0 {
        "Betelgeuse-class Red Supergiant"
    } else if mass > 15.0 {
        "Rigel-class Blue Supergiant"
    } else if mass > 10.0 {
        "Deneb-class Supergiant"
    } else {
        "Antares-class Red Giant"
    }
}
