//! PNG-sequence capture of recording sessions

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use star_renderer::PixelCanvas;

use crate::scene::BACKGROUND;

/// Sessions are numbered `session_000` upward; the first free slot is used
const MAX_SESSIONS: u32 = 1000;

pub struct Recorder {
    session_dir: PathBuf,
    canvas: PixelCanvas,
    capture_interval: u32,
    ticks: u64,
    frames: u32,
}

impl Recorder {
    /// Create the next free session directory under `root`
    pub fn start(root: &Path, capture_interval: u32, width: u32, height: u32) -> Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create {}", root.display()))?;

        let session_dir = (0..MAX_SESSIONS)
            .map(|i| root.join(format!("session_{i:03}")))
            .find(|dir| !dir.exists())
            .with_context(|| format!("no free session slot in {}", root.display()))?;

        std::fs::create_dir(&session_dir)
            .with_context(|| format!("failed to create {}", session_dir.display()))?;

        log::info!(
            "● Recording to {} ({}x{}, every {} ticks)",
            session_dir.display(),
            width,
            height,
            capture_interval.max(1)
        );

        Ok(Self {
            session_dir,
            canvas: PixelCanvas::new(width.max(1), height.max(1), BACKGROUND),
            capture_interval: capture_interval.max(1),
            ticks: 0,
            frames: 0,
        })
    }

    /// Count one simulation tick; true when this tick should be captured
    pub fn tick(&mut self) -> bool {
        let due = self.ticks % self.capture_interval as u64 == 0;
        self.ticks += 1;
        due
    }

    /// Canvas for the next frame, cleared to the scene background
    pub fn begin_frame(&mut self) -> &mut PixelCanvas {
        self.canvas.clear(BACKGROUND);
        &mut self.canvas
    }

    /// Encode the current canvas as the next numbered frame
    pub fn save_frame(&mut self) -> Result<PathBuf> {
        let path = self.session_dir.join(format!("frame_{:05}.png", self.frames));

        image::save_buffer(
            &path,
            self.canvas.as_bytes(),
            self.canvas.width(),
            self.canvas.height(),
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("failed to write {}", path.display()))?;

        self.frames += 1;
        Ok(path)
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Log a summary and hand back the session directory
    pub fn finish(self) -> PathBuf {
        log::info!(
            "✓ Saved {} frames to {}",
            self.frames,
            self.session_dir.display()
        );
        self.session_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use star_physics::Rgba;
    use star_renderer::Canvas;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "betelgeuse-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_sessions_are_numbered() {
        let root = scratch_dir("sessions");
        let first = Recorder::start(&root, 1, 8, 8).unwrap();
        let second = Recorder::start(&root, 1, 8, 8).unwrap();
        assert_eq!(first.session_dir(), root.join("session_000"));
        assert_eq!(second.session_dir(), root.join("session_001"));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_capture_interval() {
        let root = scratch_dir("interval");
        let mut recorder = Recorder::start(&root, 3, 4, 4).unwrap();
        let due: Vec<bool> = (0..7).map(|_| recorder.tick()).collect();
        assert_eq!(due, vec![true, false, false, true, false, false, true]);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_frames_are_written_as_png() {
        let root = scratch_dir("frames");
        let mut recorder = Recorder::start(&root, 1, 16, 12).unwrap();

        let canvas = recorder.begin_frame();
        canvas.fill_circle(Vec2::new(8.0, 6.0), 3.0, Rgba::new(255, 0, 0, 255));
        let path = recorder.save_frame().unwrap();
        assert_eq!(path.file_name().unwrap(), "frame_00000.png");
        recorder.save_frame().unwrap();
        assert_eq!(recorder.frames(), 2);

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (16, 12));
        assert_eq!(image.get_pixel(8, 6).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [5, 5, 15, 255]);

        // Each frame starts from a clean background
        let canvas = recorder.begin_frame();
        assert_eq!(canvas.pixel(8, 6), Some(BACKGROUND));

        let dir = recorder.finish();
        assert!(dir.join("frame_00001.png").exists());
        std::fs::remove_dir_all(&root).unwrap();
    }
}
