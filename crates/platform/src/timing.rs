//! Frame timing: fixed-step update accumulator and FPS counter.

use std::time::{Duration, Instant};

/// Upper bound on catch-up steps per frame after a stall (window drag, breakpoint).
const MAX_STEPS_PER_FRAME: u32 = 8;

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed `dt` seconds of wall time; returns how many fixed updates to run now.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // drop the backlog instead of spiraling
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Count one frame; once a second has passed, returns the average FPS and restarts.
    pub fn frame(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f64 / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_carries_remainder() {
        let mut fs = FixedStep::new(0.25);
        assert_eq!(fs.advance(0.125), 0);
        assert_eq!(fs.advance(0.25), 1);
        assert_eq!(fs.advance(0.375), 2);
        assert_eq!(fs.advance(0.0), 0);
    }

    #[test]
    fn fixed_step_caps_catch_up() {
        let mut fs = FixedStep::new(0.01);
        assert_eq!(fs.advance(10.0), MAX_STEPS_PER_FRAME);
        assert!(fs.advance(0.0) <= 1);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut fs = FixedStep::new(0.5);
        assert_eq!(fs.advance(-3.0), 0);
        assert_eq!(fs.advance(0.5), 1);
    }

    #[test]
    fn fps_reported_once_per_second() {
        let start = Instant::now();
        let mut fps = FpsCounter::new(start);
        for i in 1..60 {
            assert!(fps.frame(start + Duration::from_millis(i * 10)).is_none());
        }
        let reported = fps.frame(start + Duration::from_secs(1)).unwrap();
        assert!((reported - 60.0).abs() < 1e-9);
        assert!(fps.frame(start + Duration::from_millis(1010)).is_none());
    }
}
