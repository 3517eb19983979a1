//! Scrubbable simulated-time axis with auto-play

use star_physics::{LifecycleStage, MAX_TIME};

/// Time gained per tick while auto-playing (Gyr)
pub const AUTO_PLAY_STEP: f32 = 0.01;

/// Named position on the time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineMarker {
    pub time: f32,
    pub stage: LifecycleStage,
}

impl TimelineMarker {
    /// Position along the axis in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        self.time / MAX_TIME
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    current_time: f32,
    pub auto_play: bool,
    markers: Vec<TimelineMarker>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        let markers = LifecycleStage::ALL
            .iter()
            .map(|&stage| TimelineMarker {
                time: stage.start_time(),
                stage,
            })
            .collect();

        Self {
            current_time: 0.0,
            auto_play: false,
            markers,
        }
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Jump to an absolute time, clamped to the axis
    pub fn set_time(&mut self, time: f32) {
        self.current_time = time.clamp(0.0, MAX_TIME);
    }

    /// Current position along the axis in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        self.current_time / MAX_TIME
    }

    /// Move along the axis by one auto-play step, stopping at the end
    pub fn advance(&mut self) {
        self.current_time = (self.current_time + AUTO_PLAY_STEP).min(MAX_TIME);
    }

    pub fn reached_end(&self) -> bool {
        self.current_time >= MAX_TIME
    }

    /// Set the time from a slider position in `[0, 1]`.
    ///
    /// Snap targets are the stage markers plus the end of the axis. The
    /// position snaps onto the nearest target if it is within `snap_tolerance`
    /// (a fraction of the axis) and closer than half the gap to that target's
    /// neighbours, so tightly packed markers stay reachable.
    pub fn scrub(&mut self, fraction: f32, snap_tolerance: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        let time = fraction * MAX_TIME;
        self.current_time = time;

        let targets: Vec<f32> = self
            .markers
            .iter()
            .map(|m| m.time)
            .chain(std::iter::once(MAX_TIME))
            .collect();

        let Some((i, target)) = targets
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| (a.1 - time).abs().total_cmp(&(b.1 - time).abs()))
        else {
            return;
        };

        let reach = [i.checked_sub(1).map(|j| targets[j]), targets.get(i + 1).copied()]
            .into_iter()
            .flatten()
            .map(|neighbour| (neighbour - target).abs() / 2.0)
            .fold(snap_tolerance * MAX_TIME, f32::min);

        if (target - time).abs() < reach {
            self.current_time = target;
        }
    }

    pub fn markers(&self) -> &[TimelineMarker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_caps_at_max_time() {
        let mut timeline = Timeline::new();
        for _ in 0..2000 {
            timeline.advance();
        }
        assert_eq!(timeline.current_time(), MAX_TIME);
        assert!(timeline.reached_end());
    }

    #[test]
    fn test_advance_step() {
        let mut timeline = Timeline::new();
        timeline.advance();
        timeline.advance();
        assert!((timeline.current_time() - 0.02).abs() < 1e-6);
        assert!(!timeline.reached_end());
    }

    #[test]
    fn test_scrub_maps_fraction_to_time() {
        let mut timeline = Timeline::new();
        timeline.scrub(0.5, 0.0);
        assert!((timeline.current_time() - 6.0).abs() < 1e-5);

        timeline.scrub(2.0, 0.0);
        assert_eq!(timeline.current_time(), MAX_TIME);
        timeline.scrub(-1.0, 0.0);
        assert_eq!(timeline.current_time(), 0.0);
    }

    #[test]
    fn test_scrub_snaps_to_marker() {
        let mut timeline = Timeline::new();
        // Main sequence starts at 2 Gyr = 1/6 of the axis
        timeline.scrub(1.0 / 6.0 + 0.005, 0.01);
        assert_eq!(timeline.current_time(), 2.0);

        timeline.scrub(1.0 / 6.0 + 0.05, 0.01);
        assert!(timeline.current_time() > 2.0);
    }

    #[test]
    fn test_scrub_to_end_reaches_final() {
        let mut timeline = Timeline::new();
        timeline.scrub(1.0, 0.01);
        assert_eq!(timeline.current_time(), MAX_TIME);
        assert!(timeline.reached_end());
        assert_eq!(
            star_physics::stage_for(timeline.current_time()),
            LifecycleStage::Final
        );
    }

    #[test]
    fn test_scrub_between_close_markers() {
        let mut timeline = Timeline::new();

        // Supernova (11.9) and final (11.99) are closer than the tolerance
        timeline.scrub(11.95 / MAX_TIME, 0.01);
        assert!((timeline.current_time() - 11.95).abs() < 1e-4);
        assert_eq!(
            star_physics::stage_for(timeline.current_time()),
            LifecycleStage::Supernova
        );

        timeline.scrub(11.91 / MAX_TIME, 0.01);
        assert_eq!(timeline.current_time(), 11.9);

        timeline.scrub(11.99 / MAX_TIME, 0.01);
        assert_eq!(timeline.current_time(), 11.99);
        assert_eq!(
            star_physics::stage_for(timeline.current_time()),
            LifecycleStage::Final
        );
    }

    #[test]
    fn test_markers_follow_stage_clock() {
        let timeline = Timeline::new();
        assert_eq!(timeline.markers().len(), 6);
        for marker in timeline.markers() {
            assert_eq!(star_physics::stage_for(marker.time), marker.stage);
        }
    }

    #[test]
    fn test_set_time_clamps() {
        let mut timeline = Timeline::new();
        timeline.set_time(15.0);
        assert_eq!(timeline.current_time(), MAX_TIME);
        assert_eq!(timeline.fraction(), 1.0);
    }
}
