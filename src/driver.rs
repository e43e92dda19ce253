//! Fixed-step physics driver
//!
//! Turns wall-clock frame deltas into whole simulation ticks. The
//! accumulator never runs more than `max_substeps` ticks per update, and
//! frame gaps are clamped, so a stalled host cannot trigger a catch-up
//! avalanche.

use crate::consts::MAX_FRAME_TIME;
use crate::settings::Settings;

/// Ticks per second measured over a one second window
#[derive(Debug, Clone, Default)]
struct RateCounter {
    window_start: Option<f64>,
    count: u32,
    rate: u32,
}

impl RateCounter {
    fn tick(&mut self, time: f64, n: u32) {
        let start = *self.window_start.get_or_insert(time);
        self.count += n;
        let elapsed = time - start;
        if elapsed >= 1.0 {
            self.rate = (f64::from(self.count) / elapsed).round() as u32;
            self.window_start = Some(time);
            self.count = 0;
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    tick_duration: f64,
    max_substeps: u32,
    accumulator: f64,
    running: bool,
    iterations: RateCounter,
}

impl FixedStepDriver {
    pub fn new(cycles_per_second: u32, max_substeps: u32) -> Self {
        Self {
            tick_duration: 1.0 / f64::from(cycles_per_second.max(1)),
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            running: false,
            iterations: RateCounter::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.cycles_per_second, settings.max_substeps)
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Driver started ({:.1} ms per tick)", self.tick_duration * 1000.0);
        }
        self.running = true;
    }

    /// Stop ticking and drop any pending time
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Driver stopped");
        }
        self.running = false;
        self.accumulator = 0.0;
        self.iterations.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_duration(&self) -> f64 {
        self.tick_duration
    }

    /// Measured simulation speed
    pub fn iterations_per_second(&self) -> u32 {
        self.iterations.rate
    }

    /// Advance by `dt` seconds of wall time at timestamp `time`, calling
    /// `tick` once per whole step. Returns the number of ticks run.
    pub fn update(&mut self, dt: f64, time: f64, mut tick: impl FnMut()) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= self.tick_duration && substeps < self.max_substeps {
            tick();
            self.accumulator -= self.tick_duration;
            substeps += 1;
        }
        self.iterations.tick(time, substeps);
        substeps
    }
}
