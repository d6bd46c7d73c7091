//! In-memory collaborators for unit and integration tests.
//!
//! Always compiled (zero runtime cost), hidden from public docs.

#![doc(hidden)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::animator::ColorAnimator;
use crate::renderer::Renderer;

/// Animator that records lifecycle calls and replays queued tick colors.
#[derive(Debug, Default)]
pub struct MockAnimator {
    running: bool,
    /// Number of `start()` calls, including no-op restarts.
    pub start_calls: usize,
    /// Number of `stop()` calls, including stops while idle.
    pub stop_calls: usize,
    /// Last period passed to `set_period`.
    pub period: Option<Duration>,
    /// Colors handed out by `tick()` while running, front first.
    pub queued: VecDeque<u32>,
}

impl MockAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, colors: &[u32]) {
        self.queued.extend(colors.iter().copied());
    }
}

impl ColorAnimator for MockAnimator {
    fn start(&mut self) {
        self.start_calls += 1;
        self.running = true;
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
        self.running = false;
    }

    fn set_period(&mut self, period: Duration) {
        self.period = Some(period);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn tick(&mut self, _now: Instant) -> Option<u32> {
        if !self.running {
            return None;
        }
        self.queued.pop_front()
    }
}

/// Renderer that records every color it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Received colors, oldest first.
    pub colors: RefCell<Vec<u32>>,
    /// Answer for `is_valid_stream()`.
    pub stream_ready: Cell<bool>,
}

impl RecordingRenderer {
    pub fn new(stream_ready: bool) -> Self {
        Self {
            colors: RefCell::new(Vec::new()),
            stream_ready: Cell::new(stream_ready),
        }
    }

    pub fn last(&self) -> Option<u32> {
        self.colors.borrow().last().copied()
    }

    pub fn count(&self) -> usize {
        self.colors.borrow().len()
    }

    pub fn clear(&self) {
        self.colors.borrow_mut().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn on_update_color(&self, color: u32) {
        self.colors.borrow_mut().push(color);
    }

    fn is_valid_stream(&self) -> bool {
        self.stream_ready.get()
    }
}
