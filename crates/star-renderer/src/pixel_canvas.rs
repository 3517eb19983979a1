//! CPU rasterizer producing RGBA8 frames

use glam::Vec2;
use star_physics::Rgba;

use crate::Canvas;

/// Row-major RGBA8 image with straight alpha.
///
/// Circles are filled by scanline, sampling at pixel centres, and composited
/// with source-over blending.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Raw RGBA bytes, row-major, suitable for image encoders
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn row_mut(&mut self, y: u32) -> &mut [Rgba] {
        let start = y as usize * self.width as usize;
        &mut self.pixels[start..start + self.width as usize]
    }
}

/// Source-over compositing of straight-alpha colors
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: (out_a * 255.0).round() as u8,
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 || !center.is_finite() || color.a == 0 {
            return;
        }
        if self.width == 0 || self.height == 0 {
            return;
        }

        let r2 = radius * radius;
        let max_x = self.width as f32 - 1.0;
        let max_y = self.height as f32 - 1.0;

        let y0 = (center.y - radius - 0.5).ceil().max(0.0);
        let y1 = (center.y + radius - 0.5).floor().min(max_y);
        if y0 > y1 {
            return;
        }

        for y in y0 as u32..=y1 as u32 {
            let dy = y as f32 + 0.5 - center.y;
            let span2 = r2 - dy * dy;
            if span2 < 0.0 {
                continue;
            }
            let half = span2.sqrt();
            let x0 = (center.x - half - 0.5).ceil().max(0.0);
            let x1 = (center.x + half - 0.5).floor().min(max_x);
            if x0 > x1 {
                continue;
            }

            let row = &mut self.row_mut(y)[x0 as usize..=x1 as usize];
            if color.a == u8::MAX {
                row.fill(color);
            } else {
                for px in row {
                    *px = blend(*px, color);
                }
            }
        }
    }
}
