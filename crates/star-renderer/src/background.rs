//! Twinkling starfield and nebula haze behind the simulated star

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use star_physics::{sample_uniform, Rgba};

use crate::Canvas;

pub const BACKGROUND_STARS: usize = 200;
pub const NEBULA_BLOBS: usize = 50;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStar {
    /// World position, before camera offset and zoom
    pub position: Vec2,
    pub size: f32,
    /// In `[0.3, 1.0]`
    pub brightness: f32,
    /// Radians per millisecond
    pub twinkle_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NebulaBlob {
    pub position: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

/// Static field of stars and nebula blobs scattered over a region larger than
/// the viewport, panned and zoomed by a simple camera.
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<BackgroundStar>,
    nebulae: Vec<NebulaBlob>,
    camera: Vec2,
    zoom: f32,
}

impl Starfield {
    pub fn new(width: u32, height: u32) -> Self {
        Self::generate(width, height, &mut rand::rng())
    }

    pub fn with_seed(width: u32, height: u32, seed: u64) -> Self {
        Self::generate(width, height, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    fn generate<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        let w = width.min(i32::MAX as u32 / 2) as i32;
        let h = height.min(i32::MAX as u32 / 2) as i32;

        // Stars cover three viewports in each direction so panning reveals more
        let stars = (0..BACKGROUND_STARS)
            .map(|_| BackgroundStar {
                position: Vec2::new(
                    rng.random_range(-w..=2 * w) as f32,
                    rng.random_range(-h..=2 * h) as f32,
                ),
                size: sample_uniform(rng, 1.0, 3.0),
                brightness: sample_uniform(rng, 0.3, 1.0),
                twinkle_speed: sample_uniform(rng, 0.01, 0.05),
            })
            .collect();

        let nebulae = (0..NEBULA_BLOBS)
            .map(|_| NebulaBlob {
                position: Vec2::new(
                    rng.random_range(-w / 2..=w * 3 / 2) as f32,
                    rng.random_range(-h / 2..=h * 3 / 2) as f32,
                ),
                radius: rng.random_range(50..=200) as f32,
                color: Rgba::new(
                    rng.random_range(20..=60),
                    rng.random_range(20..=60),
                    rng.random_range(50..=100),
                    rng.random_range(20..=50),
                ),
            })
            .collect();

        log::debug!(
            "Starfield: {} stars, {} nebula blobs for {}x{}",
            BACKGROUND_STARS,
            NEBULA_BLOBS,
            width,
            height
        );

        Self {
            stars,
            nebulae,
            camera: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Recompute twinkle brightness for a wall-clock time in milliseconds
    pub fn update(&mut self, time_ms: f64) {
        for star in &mut self.stars {
            let phase = (time_ms * star.twinkle_speed as f64).sin() as f32;
            star.brightness = 0.3 + (phase + 1.0) * 0.35;
        }
    }

    /// Multiply the zoom by `factor`, staying within `[MIN_ZOOM, MAX_ZOOM]`
    pub fn apply_zoom(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Pan by a screen-space delta
    pub fn move_camera(&mut self, dx: f32, dy: f32) {
        self.camera += Vec2::new(dx, dy) / self.zoom;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn stars(&self) -> &[BackgroundStar] {
        &self.stars
    }

    pub fn nebulae(&self) -> &[NebulaBlob] {
        &self.nebulae
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        (position + self.camera) * self.zoom
    }

    /// Nebulae first, then the stars that fall inside the viewport.
    /// Returns the number of circles drawn.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> usize {
        let mut drawn = 0;

        for blob in &self.nebulae {
            canvas.fill_circle(
                self.to_screen(blob.position),
                blob.radius * self.zoom,
                blob.color,
            );
            drawn += 1;
        }

        let viewport = canvas.size();
        for star in &self.stars {
            let pos = self.to_screen(star.position);
            if pos.x < 0.0 || pos.y < 0.0 || pos.x > viewport.x || pos.y > viewport.y {
                continue;
            }
            let level = (star.brightness * 255.0) as u8;
            canvas.fill_circle(
                pos,
                star.size * self.zoom,
                Rgba::new(level, level, level, 255),
            );
            drawn += 1;
        }

        drawn
    }
}
