use crate::gauge::host::{Command, CommandSink, FrameToken, Scheduler, TimerToken};
use crate::sys::server::Outbound;
use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A frame or timer handed out by [`GlibScheduler`] that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    Frame(FrameToken),
    Timer(TimerToken),
}

/// Shared by every scheduler so that a handle fired for a replaced control can
/// never match one issued by its successor.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

fn next_token() -> u64 {
    NEXT_TOKEN.fetch_add(1, Ordering::Relaxed)
}

/// Cancellation flags shared with the scheduled callbacks. A callback that
/// finds its flag set does nothing, so a source is never removed after it
/// has already run.
struct Flags<T>(HashMap<T, Rc<Cell<bool>>>);

impl<T: Eq + Hash> Flags<T> {
    fn arm(&mut self, token: T) -> Rc<Cell<bool>> {
        // entries whose callback already ran only hold our own reference
        self.0.retain(|_, flag| Rc::strong_count(flag) > 1);
        let flag = Rc::new(Cell::new(false));
        self.0.insert(token, flag.clone());
        flag
    }

    fn cancel(&mut self, token: &T) {
        if let Some(flag) = self.0.remove(token) {
            flag.set(true);
        }
    }
}

impl<T> Default for Flags<T> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

/// Schedules display frames on a widget's frame clock and timers on the
/// default main context. Fired handles are reported through `notify`.
pub struct GlibScheduler {
    widget: gtk::Widget,
    notify: Rc<dyn Fn(Fired)>,
    frames: Flags<FrameToken>,
    timers: Flags<TimerToken>,
}

impl GlibScheduler {
    pub fn new(widget: &impl IsA<gtk::Widget>, notify: impl Fn(Fired) + 'static) -> Self {
        Self {
            widget: widget.clone().upcast(),
            notify: Rc::new(notify),
            frames: Flags::default(),
            timers: Flags::default(),
        }
    }
}

impl Scheduler for GlibScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken::from(next_token());
        let cancelled = self.frames.arm(token);
        let notify = self.notify.clone();
        self.widget.add_tick_callback(move |_, _| {
            if !cancelled.replace(true) {
                notify(Fired::Frame(token));
            }
            glib::ControlFlow::Break
        });
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.cancel(&token);
    }

    fn start_timer(&mut self, delay: Duration) -> TimerToken {
        let token = TimerToken::from(next_token());
        let cancelled = self.timers.arm(token);
        let notify = self.notify.clone();
        glib::timeout_add_local_once(delay, move || {
            if !cancelled.get() {
                notify(Fired::Timer(token));
            }
        });
        token
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        self.timers.cancel(&token);
    }
}

/// Forwards commands to the socket bridge.
pub struct ChannelSink {
    tx: async_channel::Sender<Outbound>,
}

impl ChannelSink {
    pub fn new(tx: async_channel::Sender<Outbound>) -> Self {
        Self { tx }
    }
}

impl CommandSink for ChannelSink {
    fn send(&mut self, command: Command) {
        if let Err(e) = self.tx.try_send(Outbound::Command(command)) {
            log::error!("Failed to forward command: {}", e);
        }
    }
}
