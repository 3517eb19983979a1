//! Lifecycle stages and the stage clock

use std::fmt;

use crate::color::Rgb;
use crate::constants::*;

/// Discrete phase of the simulated star, ordered by simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    Nebula,
    Protostar,
    MainSequence,
    RedSupergiant,
    Supernova,
    Final,
}

const NEBULA_PALETTE: [Rgb; 4] = [
    Rgb::new(40, 60, 100),
    Rgb::new(70, 100, 150),
    Rgb::new(100, 150, 200),
    Rgb::new(150, 200, 255),
];
const PROTOSTAR_PALETTE: [Rgb; 3] = [
    Rgb::new(180, 100, 50),
    Rgb::new(200, 150, 100),
    Rgb::new(255, 200, 150),
];
const MAIN_SEQUENCE_PALETTE: [Rgb; 3] = [
    Rgb::new(255, 230, 150),
    Rgb::new(255, 255, 200),
    Rgb::new(255, 255, 150),
];
const RED_SUPERGIANT_PALETTE: [Rgb; 3] = [
    Rgb::new(200, 50, 20),
    Rgb::new(255, 100, 50),
    Rgb::new(255, 150, 100),
];
const SUPERNOVA_PALETTE: [Rgb; 4] = [
    Rgb::new(255, 255, 255),
    Rgb::new(255, 255, 50),
    Rgb::new(255, 200, 50),
    Rgb::new(255, 150, 50),
];
const FINAL_PALETTE: [Rgb; 3] = [
    Rgb::new(20, 20, 20),
    Rgb::new(50, 50, 50),
    Rgb::new(30, 30, 30),
];

impl LifecycleStage {
    /// All stages in the order they occur on the time axis
    pub const ALL: [LifecycleStage; 6] = [
        LifecycleStage::Nebula,
        LifecycleStage::Protostar,
        LifecycleStage::MainSequence,
        LifecycleStage::RedSupergiant,
        LifecycleStage::Supernova,
        LifecycleStage::Final,
    ];

    /// Palette from the outermost (index 0) to the innermost tone
    pub fn palette(self) -> &'static [Rgb] {
        match self {
            LifecycleStage::Nebula => &NEBULA_PALETTE,
            LifecycleStage::Protostar => &PROTOSTAR_PALETTE,
            LifecycleStage::MainSequence => &MAIN_SEQUENCE_PALETTE,
            LifecycleStage::RedSupergiant => &RED_SUPERGIANT_PALETTE,
            LifecycleStage::Supernova => &SUPERNOVA_PALETTE,
            LifecycleStage::Final => &FINAL_PALETTE,
        }
    }

    /// Visual size relative to a main sequence star of the same mass
    pub fn size_multiplier(self) -> f32 {
        match self {
            LifecycleStage::Nebula => 2.0,
            LifecycleStage::Protostar => 1.5,
            LifecycleStage::MainSequence => 1.0,
            LifecycleStage::RedSupergiant => 3.0,
            LifecycleStage::Supernova => 4.0,
            LifecycleStage::Final => 0.5,
        }
    }

    /// Inclusive start of this stage on the time axis (Gyr)
    pub fn start_time(self) -> f32 {
        match self {
            LifecycleStage::Nebula => 0.0,
            LifecycleStage::Protostar => PROTOSTAR_START,
            LifecycleStage::MainSequence => MAIN_SEQUENCE_START,
            LifecycleStage::RedSupergiant => RED_SUPERGIANT_START,
            LifecycleStage::Supernova => SUPERNOVA_START,
            LifecycleStage::Final => FINAL_START,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LifecycleStage::Nebula => "Stellar Nebula",
            LifecycleStage::Protostar => "Protostar",
            LifecycleStage::MainSequence => "Main Sequence",
            LifecycleStage::RedSupergiant => "Red Supergiant",
            LifecycleStage::Supernova => "Supernova",
            LifecycleStage::Final => "Final Form",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stage clock: maps elapsed simulated time onto its lifecycle stage.
///
/// Intervals are half-open and lower-inclusive, so a breakpoint value belongs
/// to the stage that starts there. Negative times map to `Nebula`, anything at
/// or past `FINAL_START` maps to `Final`.
pub fn stage_for(elapsed_time: f32) -> LifecycleStage {
    if elapsed_time < PROTOSTAR_START {
        LifecycleStage::Nebula
    } else if elapsed_time < MAIN_SEQUENCE_START {
        LifecycleStage::Protostar
    } else if elapsed_time < RED_SUPERGIANT_START {
        LifecycleStage::MainSequence
    } else if elapsed_time < SUPERNOVA_START {
        LifecycleStage::RedSupergiant
    } else if elapsed_time < FINAL_START {
        LifecycleStage::Supernova
    } else {
        LifecycleStage::Final
    }
}
