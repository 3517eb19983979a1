//! Rolling history of illustrative star properties for the graph overlay

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use star_physics::sample_uniform;

use crate::StarSimulation;

/// Samples kept per series
pub const HISTORY_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Temperature,
    Mass,
    Luminosity,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::Temperature, Series::Mass, Series::Luminosity];

    pub fn label(self) -> &'static str {
        match self {
            Series::Temperature => "Temperature (K)",
            Series::Mass => "Mass (Solar)",
            Series::Luminosity => "Luminosity (Solar)",
        }
    }

    /// Jitter half-width added to each sample
    fn noise(self) -> f32 {
        match self {
            Series::Temperature => 100.0,
            Series::Mass => 0.05,
            Series::Luminosity => 0.1,
        }
    }

    fn index(self) -> usize {
        match self {
            Series::Temperature => 0,
            Series::Mass => 1,
            Series::Luminosity => 2,
        }
    }
}

/// Three fixed-length series sampled from the simulation, with a little
/// uniform noise so the lines look alive.
#[derive(Debug, Clone)]
pub struct DataHistory {
    series: [VecDeque<f32>; 3],
    rng: ChaCha8Rng,
}

impl Default for DataHistory {
    fn default() -> Self {
        Self::from_rng(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

impl DataHistory {
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            series: std::array::from_fn(|_| VecDeque::with_capacity(HISTORY_LEN + 1)),
            rng,
        }
    }

    /// Append one sample per series from the current simulation state
    pub fn record(&mut self, sim: &StarSimulation) {
        let time = sim.elapsed_time();
        let mass = sim.mass();

        let base = [
            (Series::Temperature, 3000.0 + time * 1000.0),
            (Series::Mass, mass),
            (Series::Luminosity, mass * (1.0 + time)),
        ];

        for (series, value) in base {
            let noise = series.noise();
            let sample = value + sample_uniform(&mut self.rng, -noise, noise);
            self.push(series, sample);
        }
    }

    fn push(&mut self, series: Series, value: f32) {
        let values = &mut self.series[series.index()];
        values.push_back(value);
        if values.len() > HISTORY_LEN {
            values.pop_front();
        }
    }

    pub fn values(&self, series: Series) -> &VecDeque<f32> {
        &self.series[series.index()]
    }

    pub fn latest(&self, series: Series) -> Option<f32> {
        self.values(series).back().copied()
    }

    /// `(min, max)` of a series; `None` when empty
    pub fn bounds(&self, series: Series) -> Option<(f32, f32)> {
        let values = self.values(series);
        let first = *values.front()?;
        Some(
            values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    pub fn clear(&mut self) {
        for values in &mut self.series {
            values.clear();
        }
    }
}
