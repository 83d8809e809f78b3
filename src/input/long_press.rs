use std::time::Duration;

/// Hold time before a press opens the flyout.
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(1000);

/// Single-shot, cancelable deadline driven by the frame clock.
///
/// Times are seconds on the same clock as `egui::InputState::time`.
#[derive(Debug, Clone, PartialEq)]
pub struct LongPressTimer {
    interval: Duration,
    armed_at: Option<f64>,
}

impl Default for LongPressTimer {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS)
    }
}

impl LongPressTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed_at: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)start the countdown. Any pending deadline is replaced.
    pub fn arm(&mut self, now: f64) {
        self.armed_at = Some(now);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Time left before the deadline, `None` when disarmed.
    pub fn remaining(&self, now: f64) -> Option<Duration> {
        let armed_at = self.armed_at?;
        let elapsed = (now - armed_at).max(0.0);
        Some(self.interval.saturating_sub(Duration::from_secs_f64(elapsed)))
    }

    /// True exactly once, on the first poll at or past the deadline.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.remaining(now) {
            Some(remaining) if remaining.is_zero() => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }
}
