//! Trailing-edge debouncer driven by host-supplied time.
//!
//! The host passes `now` in milliseconds (e.g. `performance.now()`), so the
//! same code runs against a browser clock or a scripted test clock.

#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Record an event at `now`: any pending deadline is replaced by
    /// `now + window`.
    pub fn poke(&mut self, now: f64) {
        self.deadline = Some(now + self.window_ms);
    }

    /// Returns `true` exactly once per armed deadline, when `now` reaches it.
    pub fn fire_if_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
