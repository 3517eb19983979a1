//! Render pass for the simulated star
//!
//! Reads a [`StarSimulation`] without mutating it and emits filled circles in
//! four layers: glow, particles, core rings and, during a supernova, flares.
//! Per-frame random choices (particle colors, flare placement) come from the
//! renderer's own RNG so the engine state stays untouched.

use std::borrow::Cow;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use star_physics::{sample_uniform, LifecycleStage, Rgb};
use star_simulation::StarSimulation;

use crate::Canvas;

/// Concentric translucent layers behind the star
pub const GLOW_LAYERS: usize = 15;

/// Bright spots scattered around a star in the supernova stage
pub const FLARE_COUNT: usize = 10;

const FLARE_RADIUS_MIN: f32 = 2.0;
const FLARE_RADIUS_MAX: f32 = 8.0;

/// What a single [`StarRenderer::draw`] call emitted, by layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub glow_layers: usize,
    pub particles: usize,
    pub core_rings: usize,
    pub flares: usize,
}

impl FrameStats {
    pub fn total(&self) -> usize {
        self.glow_layers + self.particles + self.core_rings + self.flares
    }
}

/// Quadratic ease-out on `[0, 1]`
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// Palette part way between two stages.
///
/// The result has the length of `to`; entries past the end of `from` blend
/// from its last color. Returns `to` untouched once `t` reaches 1.
pub fn blend_palettes(from: &'static [Rgb], to: &'static [Rgb], t: f32) -> Cow<'static, [Rgb]> {
    if t >= 1.0 || from.is_empty() || from == to {
        return Cow::Borrowed(to);
    }

    let last = from.len() - 1;
    Cow::Owned(
        to.iter()
            .enumerate()
            .map(|(i, &target)| from[i.min(last)].lerp(target, t))
            .collect(),
    )
}

pub struct StarRenderer {
    rng: ChaCha8Rng,
    crossfade: bool,
}

impl Default for StarRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StarRenderer {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
            crossfade: false,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            crossfade: false,
        }
    }

    /// Fade palettes across stage changes instead of switching on the tick
    pub fn with_crossfade(mut self, crossfade: bool) -> Self {
        self.crossfade = crossfade;
        self
    }

    pub fn crossfade(&self) -> bool {
        self.crossfade
    }

    pub fn set_crossfade(&mut self, crossfade: bool) {
        self.crossfade = crossfade;
    }

    /// Palette for the current frame
    pub fn palette(&self, sim: &StarSimulation) -> Cow<'static, [Rgb]> {
        let current = sim.stage().palette();
        if !self.crossfade {
            return Cow::Borrowed(current);
        }
        blend_palettes(
            sim.previous_stage().palette(),
            current,
            ease_out(sim.transition_progress()),
        )
    }

    pub fn draw<C: Canvas + ?Sized>(&mut self, sim: &StarSimulation, canvas: &mut C) -> FrameStats {
        let mut stats = FrameStats::default();

        let palette = self.palette(sim);
        let Some(&outer) = palette.first() else {
            return stats;
        };

        let center = canvas.center();
        let size = sim.displayed_size();

        // Glow
        for i in 0..GLOW_LAYERS {
            let radius = size * (1.5 + i as f32 * 0.2);
            let alpha = 100.0 - 6.0 * i as f32;
            canvas.fill_circle(center, radius, outer.with_alpha(alpha));
            stats.glow_layers += 1;
        }

        // Particles
        for particle in sim.particles() {
            let color = self.pick(&palette);
            canvas.fill_circle(
                center + particle.offset(),
                particle.render_size,
                color.with_alpha(particle.alpha()),
            );
            stats.particles += 1;
        }

        // Core: outermost ring first so inner tones land on top
        let len = palette.len();
        for radius in core_ring_radii(size, canvas.size().length()) {
            let index = ((radius as f32 / size * len as f32) as usize).min(len - 1);
            canvas.fill_circle(center, radius as f32, palette[index].opaque());
            stats.core_rings += 1;
        }

        if sim.stage() == LifecycleStage::Supernova {
            for _ in 0..FLARE_COUNT {
                let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
                let distance = sample_uniform(&mut self.rng, 0.0, size * 2.0);
                let radius = sample_uniform(&mut self.rng, FLARE_RADIUS_MIN, FLARE_RADIUS_MAX);
                let color = self.pick(&palette);
                canvas.fill_circle(
                    center + Vec2::from_angle(angle) * distance,
                    radius,
                    color.opaque(),
                );
                stats.flares += 1;
            }
        }

        stats
    }

    fn pick(&mut self, palette: &[Rgb]) -> Rgb {
        palette[self.rng.random_range(0..palette.len())]
    }
}

/// Ring radii from `floor(size)` down to 1 in steps of 2.
///
/// A ring at or beyond `limit` (the canvas diagonal) covers the whole canvas,
/// so the sequence starts at the smallest such radius with the same parity as
/// `floor(size)`.
fn core_ring_radii(size: f32, limit: f32) -> impl Iterator<Item = i64> {
    // NaN and negative sizes cast to 0 and yield no rings
    let top = size.floor() as i64;
    let limit = limit.ceil() as i64;
    let start = if top > limit {
        top - (top - limit) / 2 * 2
    } else {
        top
    };
    (1..=start).rev().step_by(2)
}
