//! Everything the window shows, minus the window
//!
//! One [`Scene::tick`] per frame: timeline and parameter controls are pushed
//! into the engine, the engine steps once, and the recorder captures if due.
//! Drawing is separate so the same state can go to the screen and to a
//! captured frame.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use star_physics::{Rgba, MAX_TIME};
use star_renderer::{Canvas, FrameStats, StarRenderer, Starfield};
use star_simulation::{
    DataHistory, OutcomePredictor, ParameterControls, SimulationParams, StarSimulation, Timeline,
};

use crate::recorder::Recorder;

/// Window clear color
pub const BACKGROUND: Rgba = Rgba::new(5, 5, 15, 255);

/// Scrubbing closer than this (fraction of the slider) snaps to a stage start
pub const SNAP_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    pub particles: usize,
    pub seed: Option<u64>,
    pub record_dir: PathBuf,
    pub capture_interval: u32,
    pub crossfade: bool,
}

pub struct Scene {
    pub simulation: StarSimulation,
    pub renderer: StarRenderer,
    pub starfield: Starfield,
    pub timeline: Timeline,
    pub controls: ParameterControls,
    pub history: DataHistory,
    pub predictor: OutcomePredictor,

    pub paused: bool,
    pub show_graphs: bool,
    pub show_analysis: bool,

    /// Result of the most recent on-screen draw
    pub last_stats: FrameStats,

    recorder: Option<Recorder>,
    record_dir: PathBuf,
    capture_interval: u32,
    rng: ChaCha8Rng,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        let params = SimulationParams::default().with_particle_count(config.particles);

        // A fixed seed makes every random source reproducible
        let (simulation, renderer, starfield, history, rng) = match config.seed {
            Some(seed) => (
                StarSimulation::with_seed(params, seed),
                StarRenderer::with_seed(seed.wrapping_add(1)),
                Starfield::with_seed(config.width, config.height, seed.wrapping_add(2)),
                DataHistory::with_seed(seed.wrapping_add(3)),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(4)),
            ),
            None => (
                StarSimulation::new(params),
                StarRenderer::new(),
                Starfield::new(config.width, config.height),
                DataHistory::default(),
                ChaCha8Rng::from_rng(&mut rand::rng()),
            ),
        };

        Self {
            simulation,
            renderer: renderer.with_crossfade(config.crossfade),
            starfield,
            timeline: Timeline::new(),
            controls: ParameterControls::default(),
            history,
            predictor: OutcomePredictor::new(),
            paused: false,
            show_graphs: false,
            show_analysis: false,
            last_stats: FrameStats::default(),
            recorder: None,
            record_dir: config.record_dir.clone(),
            capture_interval: config.capture_interval,
            rng,
        }
    }

    /// Advance one frame. `time_ms` drives the starfield twinkle.
    ///
    /// A failed frame capture ends the recording session and is returned.
    pub fn tick(&mut self, time_ms: f64) -> Result<()> {
        if self.timeline.auto_play && !self.paused {
            self.timeline.advance();
        }

        self.simulation.set_elapsed_time(self.timeline.current_time());
        self.simulation.set_mass(self.controls.mass());
        self.simulation.set_metallicity(self.controls.metallicity());

        self.starfield.update(time_ms);
        self.simulation.update();

        if self.show_graphs {
            self.history.record(&self.simulation);
        }

        let captured = self.capture();
        if captured.is_err() {
            self.stop_recording();
        }
        captured
    }

    fn capture(&mut self) -> Result<()> {
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(());
        };

        if self.simulation.elapsed_time() >= MAX_TIME {
            self.timeline.auto_play = false;
            self.stop_recording();
            return Ok(());
        }

        // Frames only advance with the timeline
        if self.paused || !self.timeline.auto_play {
            return Ok(());
        }

        if recorder.tick() {
            let canvas = recorder.begin_frame();
            self.starfield.draw(canvas);
            self.renderer.draw(&self.simulation, canvas);
            recorder.save_frame()?;
        }
        Ok(())
    }

    /// Background then star
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> FrameStats {
        self.starfield.draw(canvas);
        self.last_stats = self.renderer.draw(&self.simulation, canvas);
        self.last_stats
    }

    /// Back to t = 0 with a fresh particle field
    pub fn reset(&mut self) {
        self.timeline.set_time(0.0);
        self.simulation.reset();
        self.history.clear();
        log::info!("Simulation reset");
    }

    /// Move the timeline slider; snaps to nearby stage starts
    pub fn scrub(&mut self, time: f32) {
        self.timeline.scrub(time / MAX_TIME, SNAP_TOLERANCE);
    }

    /// Start a session with a random star from t = 0, frames sized
    /// `width` x `height`
    pub fn start_recording(&mut self, width: u32, height: u32) -> Result<()> {
        if self.recorder.is_some() {
            self.stop_recording();
        }

        let recorder = Recorder::start(&self.record_dir, self.capture_interval, width, height)?;

        self.controls.randomize(&mut self.rng);
        self.timeline.set_time(0.0);
        self.timeline.auto_play = true;
        self.paused = false;
        self.show_analysis = true;
        log::info!(
            "Recording star: {:.3} M☉, Z = {:.3}",
            self.controls.mass(),
            self.controls.metallicity()
        );

        self.recorder = Some(recorder);
        Ok(())
    }

    pub fn stop_recording(&mut self) -> Option<PathBuf> {
        self.recorder.take().map(Recorder::finish)
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    pub fn recording_dir(&self) -> Option<&Path> {
        self.recorder.as_ref().map(Recorder::session_dir)
    }

    pub fn recorded_frames(&self) -> u32 {
        self.recorder.as_ref().map_or(0, Recorder::frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_physics::LifecycleStage;
    use star_renderer::RecordingCanvas;
    use star_simulation::{Series, AUTO_PLAY_STEP};

    fn config(record_dir: PathBuf) -> SceneConfig {
        SceneConfig {
            width: 64,
            height: 48,
            particles: 20,
            seed: Some(7),
            record_dir,
            capture_interval: 10,
            crossfade: false,
        }
    }

    fn scene() -> Scene {
        Scene::new(&config(std::env::temp_dir().join("betelgeuse-unused")))
    }

    #[test]
    fn test_tick_pushes_controls_into_engine() {
        let mut scene = scene();
        scene.controls.set_mass(35.0);
        scene.controls.set_metallicity(0.01);
        scene.timeline.set_time(5.0);
        scene.tick(0.0).unwrap();

        assert_eq!(scene.simulation.mass(), 35.0);
        assert_eq!(scene.simulation.metallicity(), 0.01);
        assert_eq!(scene.simulation.elapsed_time(), 5.0);
        assert_eq!(scene.simulation.stage(), LifecycleStage::MainSequence);
        assert_eq!(scene.simulation.particle_count(), 20);
    }

    #[test]
    fn test_auto_play_respects_pause() {
        let mut scene = scene();
        scene.timeline.auto_play = true;
        scene.tick(0.0).unwrap();
        assert!((scene.timeline.current_time() - AUTO_PLAY_STEP).abs() < 1e-6);

        scene.paused = true;
        scene.tick(16.0).unwrap();
        assert!((scene.timeline.current_time() - AUTO_PLAY_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_history_only_records_while_graphs_shown() {
        let mut scene = scene();
        scene.tick(0.0).unwrap();
        assert_eq!(scene.history.latest(Series::Mass), None);

        scene.show_graphs = true;
        scene.tick(0.0).unwrap();
        assert!(scene.history.latest(Series::Mass).is_some());
    }

    #[test]
    fn test_reset_rewinds() {
        let mut scene = scene();
        scene.show_graphs = true;
        scene.timeline.set_time(9.0);
        scene.tick(0.0).unwrap();
        scene.reset();

        assert_eq!(scene.timeline.current_time(), 0.0);
        assert_eq!(scene.simulation.stage(), LifecycleStage::Nebula);
        assert_eq!(scene.history.latest(Series::Temperature), None);
    }

    #[test]
    fn test_draw_reports_stats() {
        let mut scene = scene();
        scene.timeline.set_time(11.95);
        scene.tick(0.0).unwrap();

        let mut canvas = RecordingCanvas::new(64.0, 48.0);
        let stats = scene.draw(&mut canvas);
        assert_eq!(stats.flares, 10);
        assert_eq!(scene.last_stats, stats);
        assert!(canvas.circles.len() > stats.total());
    }

    #[test]
    fn test_scrub_to_end_of_slider_shows_final_stage() {
        let mut scene = scene();
        scene.scrub(MAX_TIME);
        scene.tick(0.0).unwrap();
        assert_eq!(scene.simulation.stage(), LifecycleStage::Final);

        scene.scrub(11.95);
        scene.tick(0.0).unwrap();
        assert_eq!(scene.simulation.stage(), LifecycleStage::Supernova);
    }

    #[test]
    fn test_recording_holds_while_stopped() {
        let root = std::env::temp_dir().join(format!("betelgeuse-hold-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);

        let mut scene = Scene::new(&config(root.clone()));
        scene.start_recording(16, 12).unwrap();
        scene.tick(0.0).unwrap();
        assert_eq!(scene.recorded_frames(), 1);

        scene.paused = true;
        for _ in 0..50 {
            scene.tick(0.0).unwrap();
        }
        assert_eq!(scene.recorded_frames(), 1);

        scene.paused = false;
        scene.timeline.auto_play = false;
        for _ in 0..50 {
            scene.tick(0.0).unwrap();
        }
        assert_eq!(scene.recorded_frames(), 1);
        assert!(scene.is_recording());

        scene.timeline.auto_play = true;
        for _ in 0..10 {
            scene.tick(0.0).unwrap();
        }
        assert_eq!(scene.recorded_frames(), 2);

        scene.stop_recording();
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_recording_session_runs_to_the_end() {
        let root = std::env::temp_dir().join(format!("betelgeuse-scene-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);

        let mut scene = Scene::new(&config(root.clone()));
        scene.timeline.set_time(6.0);
        scene.start_recording(32, 24).unwrap();

        assert!(scene.is_recording());
        assert!(scene.show_analysis);
        assert!(scene.timeline.auto_play);
        assert_eq!(scene.timeline.current_time(), 0.0);
        assert!(ParameterControls::MASS_RANGE.contains(&scene.controls.mass()));

        // 12 Gyr at 0.01 per tick, plus slack for rounding
        for _ in 0..1300 {
            scene.tick(0.0).unwrap();
            if !scene.is_recording() {
                break;
            }
        }

        assert!(!scene.is_recording());
        assert!(!scene.timeline.auto_play);
        assert!(scene.timeline.reached_end());

        let session = root.join("session_000");
        let frames = std::fs::read_dir(&session).unwrap().count();
        assert!(frames >= 100, "only {frames} frames");
        assert!(session.join("frame_00000.png").exists());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
