//! Color-cycling animation engine ("lava lamp").
//!
//! The engine is pull-based: the owner of the processing loop calls
//! [`ColorAnimator::tick`] once per frame, which keeps every tick serialized
//! with the other inputs on the same thread.

use std::time::{Duration, Instant};

use crate::color;
use crate::settings::LAVA_LAMP_SPEED_DEFAULT;

/// Shortest accepted cycle period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A periodic color source.
pub trait ColorAnimator {
    /// Begin cycling. Starting an already running animator has no effect.
    fn start(&mut self);
    /// Stop cycling. No further ticks are produced until the next `start`.
    fn stop(&mut self);
    /// Set the duration of one full cycle.
    fn set_period(&mut self, period: Duration);
    fn is_running(&self) -> bool;
    /// Color for the frame at `now`, or `None` while stopped.
    fn tick(&mut self, now: Instant) -> Option<u32>;
}

/// Full-saturation hue rotation, one revolution per period.
#[derive(Debug, Clone)]
pub struct HueCycle {
    period: Duration,
    started: Option<Instant>,
}

impl Default for HueCycle {
    fn default() -> Self {
        Self::new(Duration::from_millis(LAVA_LAMP_SPEED_DEFAULT as u64))
    }
}

impl HueCycle {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            started: None,
        }
    }

    /// Start with an explicit phase origin. No-op if already running.
    pub fn start_at(&mut self, origin: Instant) {
        if self.started.is_none() {
            self.started = Some(origin);
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Hue in degrees at `now` (0 before start).
    pub fn hue_at(&self, now: Instant) -> f32 {
        let Some(origin) = self.started else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(origin).as_nanos();
        let period = self.period.as_nanos();
        let phase = (elapsed % period) as f64 / period as f64;
        (phase * 360.0) as f32
    }
}

impl ColorAnimator for HueCycle {
    fn start(&mut self) {
        self.start_at(Instant::now());
    }

    fn stop(&mut self) {
        self.started = None;
    }

    fn set_period(&mut self, period: Duration) {
        self.period = period.max(MIN_PERIOD);
    }

    fn is_running(&self) -> bool {
        self.started.is_some()
    }

    fn tick(&mut self, now: Instant) -> Option<u32> {
        self.started?;
        Some(color::hsv_to_color(self.hue_at(now), 1.0, 1.0))
    }
}
