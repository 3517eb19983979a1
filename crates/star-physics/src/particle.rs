//! Decorative orbiting particles

use glam::Vec2;
use rand::Rng;

use crate::constants::*;

/// One orbiting point of the particle field.
///
/// `angle` is never wrapped: it accumulates across ticks and is only reduced
/// when a position is computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Orbital angle in radians, any magnitude
    pub angle: f32,
    /// Angular speed at reference mass; fixed for the particle's lifetime
    pub angular_speed: f32,
    /// Distance from the star centre
    pub orbit_radius: f32,
    /// Radius of the drawn dot
    pub render_size: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

/// Uniform sample between `lo` and `hi`.
///
/// Unlike `random_range` this never panics on an empty or inverted range, which
/// keeps degenerate star sizes (zero or negative mass) from aborting a tick.
pub fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.random::<f32>()
}

impl Particle {
    /// Draw a fresh particle orbiting a star of the given displayed size
    pub fn random<R: Rng + ?Sized>(rng: &mut R, star_size: f32) -> Self {
        Self {
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            angular_speed: sample_uniform(rng, ANGULAR_SPEED_MIN, ANGULAR_SPEED_MAX),
            orbit_radius: sample_uniform(
                rng,
                star_size * ORBIT_RADIUS_MIN_FACTOR,
                star_size * ORBIT_RADIUS_MAX_FACTOR,
            ),
            render_size: sample_uniform(rng, RENDER_SIZE_MIN, RENDER_SIZE_MAX),
            opacity: sample_uniform(rng, OPACITY_MIN, OPACITY_MAX),
        }
    }

    /// Advance the orbit by one tick. `mass_scale` is the star mass over the
    /// reference mass, so heavier stars spin their field faster.
    pub fn advance(&mut self, mass_scale: f32) {
        self.angle += self.angular_speed * ANGULAR_STEP * mass_scale;
    }

    /// Offset from the star centre (screen coordinates, y down)
    pub fn offset(&self) -> Vec2 {
        let angle = self.angle.rem_euclid(std::f32::consts::TAU);
        Vec2::new(angle.cos(), angle.sin()) * self.orbit_radius
    }

    /// Opacity mapped to an 8-bit alpha
    pub fn alpha(&self) -> f32 {
        self.opacity * 255.0
    }
}
