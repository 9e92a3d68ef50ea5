//! Deterministic stand-ins for the host event loop and command sink.

use super::host::{Command, CommandSink, FrameToken, Scheduler, TimerToken};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<(TimerToken, Duration)>,
    frames: Vec<FrameToken>,
}

impl ManualScheduler {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn live_timers(&self) -> Vec<TimerToken> {
        self.timers.iter().map(|(t, _)| *t).collect()
    }

    pub fn pending_frames(&self) -> Vec<FrameToken> {
        self.frames.clone()
    }

    /// Moves the clock forward and returns the timers that came due, earliest
    /// first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerToken> {
        self.now += by;
        let now = self.now;
        let mut due: Vec<_> = self.timers.iter().copied().filter(|(_, at)| *at <= now).collect();
        self.timers.retain(|(_, at)| *at > now);
        due.sort_by_key(|(_, at)| *at);
        due.into_iter().map(|(t, _)| t).collect()
    }

    /// Ends the current display frame.
    pub fn take_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.frames)
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::from(self.next());
        self.frames.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.retain(|t| *t != token);
    }

    fn start_timer(&mut self, delay: Duration) -> TimerToken {
        let token = TimerToken::from(self.next());
        self.timers.push((token, self.now + delay));
        token
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        self.timers.retain(|(t, _)| *t != token);
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Vec<Command>,
}

impl CommandSink for RecordingSink {
    fn send(&mut self, command: Command) {
        self.sent.push(command);
    }
}
