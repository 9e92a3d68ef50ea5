use super::host::{Scheduler, TimerToken};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    timer: TimerToken,
    value: f64,
}

/// Trailing-edge rate limiter for outbound values. Every request restarts the
/// window; only the most recent value is sent once the window elapses.
#[derive(Debug)]
pub struct Dispatcher {
    delay: Duration,
    pending: Option<Pending>,
}

impl Dispatcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request(&mut self, value: f64, scheduler: &mut impl Scheduler) {
        if let Some(prev) = self.pending.take() {
            scheduler.cancel_timer(prev.timer);
        }
        let timer = scheduler.start_timer(self.delay);
        self.pending = Some(Pending { timer, value });
    }

    /// Value to send for a fired timer. Tokens from superseded windows yield
    /// nothing.
    pub fn next_dispatch_value(&mut self, fired: TimerToken) -> Option<f64> {
        match self.pending {
            Some(p) if p.timer == fired => {
                self.pending = None;
                Some(p.value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(p) = self.pending.take() {
            scheduler.cancel_timer(p.timer);
        }
    }
}
