//! Stage-transition and rendering-state engine
//!
//! One call to [`StarSimulation::update`] is one tick: the stage is re-derived
//! from elapsed time, transition progress advances, the displayed size eases
//! toward its target and the particle field moves and turns over.
//!
//! Caller contract: `mass` and `metallicity` are not validated. Zero or
//! negative mass yields a non-positive target size and a frozen or reversed
//! particle field; nothing panics, the geometry is just degenerate. Clamping
//! belongs to the parameter controls.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use star_physics::{
    sample_uniform, stage_for, LifecycleStage, Particle, DEFAULT_MASS, DEFAULT_METALLICITY,
    MAX_TIME, OPACITY_MAX, OPACITY_MIN,
};

use crate::SimulationParams;

/// Lifecycle engine state. Cloning it is the snapshot path for a renderer that
/// lives on another thread.
#[derive(Clone, Debug)]
pub struct StarSimulation {
    params: SimulationParams,
    rng: ChaCha8Rng,

    // Written by collaborators before each tick
    elapsed_time: f32,
    mass: f32,
    metallicity: f32,

    // Engine-owned
    stage: LifecycleStage,
    previous_stage: LifecycleStage,
    transition_ticks: u32,
    transition_progress: f32,
    displayed_size: f32,
    particles: Box<[Particle]>,
    tick: u64,
}

impl StarSimulation {
    /// Engine seeded from the thread RNG
    pub fn new(params: SimulationParams) -> Self {
        Self::from_rng(params, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Deterministic engine for tests and reproducible recordings
    pub fn with_seed(params: SimulationParams, seed: u64) -> Self {
        Self::from_rng(params, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(params: SimulationParams, mut rng: ChaCha8Rng) -> Self {
        let particles = Self::spawn_particles(&mut rng, params.particle_count, params.base_size);

        log::debug!(
            "StarSimulation: {} particles, base size {}",
            particles.len(),
            params.base_size
        );

        Self {
            params,
            rng,
            elapsed_time: 0.0,
            mass: DEFAULT_MASS,
            metallicity: DEFAULT_METALLICITY,
            stage: LifecycleStage::Nebula,
            previous_stage: LifecycleStage::Nebula,
            transition_ticks: 0,
            transition_progress: 0.0,
            displayed_size: params.base_size,
            particles,
            tick: 0,
        }
    }

    fn spawn_particles(rng: &mut ChaCha8Rng, count: usize, star_size: f32) -> Box<[Particle]> {
        (0..count)
            .map(|_| Particle::random(rng, star_size))
            .collect()
    }

    /// Advance the engine by one tick
    pub fn update(&mut self) {
        self.tick += 1;

        // Stage clock + transition tracker
        let stage = stage_for(self.elapsed_time);
        if stage != self.stage {
            log::debug!(
                "stage change at t={:.3} Gyr: {} -> {}",
                self.elapsed_time,
                self.stage,
                stage
            );
            self.previous_stage = self.stage;
            self.stage = stage;
            self.transition_ticks = 0;
        }
        // Progress is derived from a tick count so that exactly 1/step ticks
        // land on 1.0 without accumulated rounding.
        self.transition_ticks = self.transition_ticks.saturating_add(1);
        self.transition_progress =
            (self.transition_ticks as f32 * self.params.transition_step).min(1.0);

        // Size interpolator
        let target = self.target_size();
        self.displayed_size += (target - self.displayed_size) * self.params.size_smoothing;

        // Particle field
        let mass_scale = self.mass / self.params.reference_mass;
        let star_size = self.displayed_size;
        let replace_probability = self.params.replace_probability.clamp(0.0, 1.0);
        for particle in self.particles.iter_mut() {
            particle.advance(mass_scale);
            particle.opacity = sample_uniform(&mut self.rng, OPACITY_MIN, OPACITY_MAX);

            if self.rng.random_bool(replace_probability) {
                *particle = Particle::random(&mut self.rng, star_size);
            }
        }
    }

    /// Return to t = 0 with a fresh particle field at base size
    pub fn reset(&mut self) {
        self.elapsed_time = 0.0;
        self.stage = LifecycleStage::Nebula;
        self.previous_stage = LifecycleStage::Nebula;
        self.transition_ticks = 0;
        self.transition_progress = 0.0;
        self.displayed_size = self.params.base_size;
        self.particles = Self::spawn_particles(
            &mut self.rng,
            self.params.particle_count,
            self.params.base_size,
        );
    }

    /// Size the displayed size is currently easing toward
    pub fn target_size(&self) -> f32 {
        self.params.base_size
            * self.stage.size_multiplier()
            * (self.mass / self.params.reference_mass)
    }

    /// Set simulated time (Gyr), clamped to `[0, MAX_TIME]`
    pub fn set_elapsed_time(&mut self, elapsed_time: f32) {
        self.elapsed_time = elapsed_time.clamp(0.0, MAX_TIME);
    }

    /// Set stellar mass (solar masses). Not validated, see the module docs.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    /// Set metallicity. Stored for collaborators; the engine does not read it.
    pub fn set_metallicity(&mut self, metallicity: f32) {
        self.metallicity = metallicity;
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn metallicity(&self) -> f32 {
        self.metallicity
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    /// Stage before the most recent change (equal to `stage()` until the first change)
    pub fn previous_stage(&self) -> LifecycleStage {
        self.previous_stage
    }

    pub fn transition_progress(&self) -> f32 {
        self.transition_progress
    }

    pub fn displayed_size(&self) -> f32 {
        self.displayed_size
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of ticks since construction
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> StarSimulation {
        StarSimulation::with_seed(SimulationParams::default(), 42)
    }

    #[test]
    fn test_first_tick_from_rest() {
        let mut sim = sim();
        sim.set_mass(20.0);
        sim.set_metallicity(0.02);
        sim.set_elapsed_time(0.0);

        sim.update();

        assert_eq!(sim.stage(), LifecycleStage::Nebula);
        assert_eq!(sim.transition_progress(), 0.02);
        // 10% of the way from 150 toward 150 * 2 * (20 / 20) = 300
        assert!((sim.displayed_size() - 165.0).abs() < 1e-4);
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_stage_follows_elapsed_time() {
        let mut sim = sim();
        sim.set_elapsed_time(11.95);
        sim.update();
        assert_eq!(sim.stage(), LifecycleStage::Supernova);
        assert_eq!(sim.previous_stage(), LifecycleStage::Nebula);

        sim.set_elapsed_time(5.0);
        sim.update();
        assert_eq!(sim.stage(), LifecycleStage::MainSequence);
        assert_eq!(sim.previous_stage(), LifecycleStage::Supernova);
    }

    #[test]
    fn test_elapsed_time_is_clamped() {
        let mut sim = sim();
        sim.set_elapsed_time(40.0);
        assert_eq!(sim.elapsed_time(), 12.0);
        sim.set_elapsed_time(-3.0);
        assert_eq!(sim.elapsed_time(), 0.0);
    }

    #[test]
    fn test_transition_progress_reaches_one_after_fifty_ticks() {
        let mut sim = sim();
        for _ in 0..49 {
            sim.update();
        }
        assert!(sim.transition_progress() < 1.0);
        sim.update();
        assert_eq!(sim.transition_progress(), 1.0);
        for _ in 0..20 {
            sim.update();
        }
        assert_eq!(sim.transition_progress(), 1.0);
    }

    #[test]
    fn test_transition_progress_resets_on_stage_change() {
        let mut sim = sim();
        for _ in 0..10 {
            sim.update();
        }
        assert!((sim.transition_progress() - 0.2).abs() < 1e-6);

        sim.set_elapsed_time(1.0);
        sim.update();
        assert_eq!(sim.stage(), LifecycleStage::Protostar);
        assert_eq!(sim.transition_progress(), 0.02);
    }

    #[test]
    fn test_transition_progress_is_monotone_within_stage() {
        let mut sim = sim();
        sim.set_elapsed_time(3.0);
        sim.update();
        let mut prior = sim.transition_progress();
        for _ in 0..80 {
            sim.update();
            let expected = (prior + 0.02).min(1.0);
            assert!((sim.transition_progress() - expected).abs() < 1e-5);
            assert!(sim.transition_progress() >= prior);
            prior = sim.transition_progress();
        }
    }

    #[test]
    fn test_displayed_size_converges_geometrically() {
        let mut sim = sim();
        sim.set_mass(20.0);
        sim.set_elapsed_time(9.0);
        sim.update();
        assert_eq!(sim.stage(), LifecycleStage::RedSupergiant);

        let target = 450.0f64;
        let s0 = 150.0f64;
        for n in 2..=60 {
            sim.update();
            let expected = target - (target - s0) * 0.9f64.powi(n);
            let actual = sim.displayed_size() as f64;
            assert!(
                (actual - expected).abs() < 1e-3 * target,
                "tick {n}: {actual} vs {expected}"
            );
        }
    }

    #[test]
    fn test_displayed_size_never_overshoots() {
        let mut sim = sim();
        sim.set_mass(50.0);
        sim.set_elapsed_time(11.95);
        let target = sim.params().base_size * 4.0 * (50.0 / 20.0);
        let mut gap = (sim.displayed_size() - target).abs();
        for _ in 0..200 {
            sim.update();
            assert!(sim.displayed_size() <= target);
            let next_gap = (sim.displayed_size() - target).abs();
            assert!(next_gap <= gap);
            gap = next_gap;
        }

        // Now shrink toward the final form
        sim.set_elapsed_time(12.0);
        sim.update();
        let target = sim.target_size();
        let mut gap = (sim.displayed_size() - target).abs();
        for _ in 0..200 {
            sim.update();
            assert!(sim.displayed_size() >= target);
            let next_gap = (sim.displayed_size() - target).abs();
            assert!(next_gap <= gap);
            gap = next_gap;
        }
    }

    #[test]
    fn test_particle_count_is_invariant() {
        let params = SimulationParams::default().with_particle_count(64);
        let mut sim = StarSimulation::with_seed(params, 3);
        assert_eq!(sim.particle_count(), 64);
        for i in 0..1000 {
            sim.set_elapsed_time(i as f32 * 0.012);
            sim.update();
            assert_eq!(sim.particle_count(), 64);
        }
        sim.reset();
        assert_eq!(sim.particle_count(), 64);
    }

    #[test]
    fn test_default_particle_count() {
        assert_eq!(sim().particle_count(), 150);
    }

    #[test]
    fn test_particle_ranges_hold_under_updates() {
        let mut sim = sim();
        for _ in 0..500 {
            sim.update();
            for p in sim.particles() {
                assert!((0.3..=1.0).contains(&p.opacity));
                assert!((0.5..=2.0).contains(&p.angular_speed));
            }
        }
    }

    #[test]
    fn test_angular_speed_fixed_without_replacement() {
        let params = SimulationParams {
            replace_probability: 0.0,
            ..SimulationParams::default()
        };
        let mut sim = StarSimulation::with_seed(params, 11);
        let speeds: Vec<f32> = sim.particles().iter().map(|p| p.angular_speed).collect();
        let radii: Vec<f32> = sim.particles().iter().map(|p| p.orbit_radius).collect();
        for _ in 0..300 {
            sim.update();
        }
        let after: Vec<f32> = sim.particles().iter().map(|p| p.angular_speed).collect();
        let radii_after: Vec<f32> = sim.particles().iter().map(|p| p.orbit_radius).collect();
        assert_eq!(speeds, after);
        assert_eq!(radii, radii_after);
    }

    #[test]
    fn test_particles_turn_over_stochastically() {
        let mut sim = sim();
        let radii: Vec<f32> = sim.particles().iter().map(|p| p.orbit_radius).collect();
        for _ in 0..200 {
            sim.update();
        }
        let replaced = sim
            .particles()
            .iter()
            .zip(&radii)
            .filter(|(p, r)| p.orbit_radius != **r)
            .count();
        // Expected survival after 200 ticks is 0.99^200 ~= 13%
        assert!(replaced > 100, "only {replaced} of 150 replaced");
    }

    #[test]
    fn test_replacement_uses_current_size() {
        let params = SimulationParams {
            replace_probability: 1.0,
            ..SimulationParams::default()
        };
        let mut sim = StarSimulation::with_seed(params, 5);
        sim.set_mass(20.0);
        sim.set_elapsed_time(5.0);
        for _ in 0..100 {
            sim.update();
        }
        let size = sim.displayed_size();
        for p in sim.particles() {
            assert!(p.orbit_radius >= 0.8 * size - 1e-3);
            assert!(p.orbit_radius <= 2.5 * size + 1e-3);
        }
    }

    #[test]
    fn test_angle_advances_with_mass() {
        let params = SimulationParams {
            replace_probability: 0.0,
            ..SimulationParams::default()
        };
        let mut sim = StarSimulation::with_seed(params, 9);
        sim.set_mass(40.0);
        let before: Vec<Particle> = sim.particles().to_vec();
        sim.update();
        for (old, new) in before.iter().zip(sim.particles()) {
            let expected = old.angle + old.angular_speed * 0.02 * 2.0;
            assert!((new.angle - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = sim();
        let mut b = sim();
        for _ in 0..100 {
            a.update();
            b.update();
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.displayed_size(), b.displayed_size());
    }

    #[test]
    fn test_degenerate_mass_does_not_panic() {
        let mut sim = sim();
        sim.set_mass(0.0);
        for _ in 0..100 {
            sim.update();
        }
        assert!(sim.displayed_size() < 1.0);
        assert_eq!(sim.particle_count(), 150);

        sim.set_mass(-10.0);
        for _ in 0..100 {
            sim.update();
        }
        assert!(sim.displayed_size() < 0.0);
        assert_eq!(sim.particle_count(), 150);
    }

    #[test]
    fn test_metallicity_does_not_affect_state() {
        let mut a = sim();
        let mut b = sim();
        b.set_metallicity(0.001);
        for _ in 0..50 {
            a.update();
            b.update();
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.displayed_size(), b.displayed_size());
        assert_eq!(b.metallicity(), 0.001);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = sim();
        sim.set_elapsed_time(9.0);
        for _ in 0..30 {
            sim.update();
        }
        sim.reset();
        assert_eq!(sim.elapsed_time(), 0.0);
        assert_eq!(sim.stage(), LifecycleStage::Nebula);
        assert_eq!(sim.transition_progress(), 0.0);
        assert_eq!(sim.displayed_size(), 150.0);
    }
}
