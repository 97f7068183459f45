//! Timed animation schedule
//!
//! The host loop asks [`Animation::due`] once per iteration and, when it
//! returns `true`, spins the orientation by [`Animation::step`] and repaints.
use std::time::{Duration, Instant};

/// Default interval between animation steps.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(80);

/// Degrees turned about X, Y and Z per step.
pub const DEFAULT_STEP: (f64, f64, f64) = (5.0, 5.0, 5.0);

#[derive(Debug, Clone)]
pub struct Animation {
    enabled: bool,
    interval: Duration,
    step: (f64, f64, f64),
    last: Option<Instant>,
}

impl Animation {
    pub fn new(enabled: bool, interval: Duration) -> Self {
        Self {
            enabled,
            interval,
            step: DEFAULT_STEP,
            last: None,
        }
    }

    pub fn with_step(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.step = (dx, dy, dz);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip between running and paused, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.last = None;
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn step(&self) -> (f64, f64, f64) {
        self.step
    }

    /// Whether a step should run at `now`. Fires at most once per interval,
    /// and never while paused.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left until the next step, `None` while paused.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        Some(match self.last {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        })
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(true, DEFAULT_INTERVAL)
    }
}
