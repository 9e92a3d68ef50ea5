use std::time::Duration;

pub mod action;
pub mod control;
pub mod dispatch;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod layout;
pub mod position;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

pub use control::{Control, Presentation, Status};
pub use geometry::{Point, Rect};
pub use host::{Command, CommandSink, EntityId, EntitySnapshot, HostEvent, Scheduler, StateSource};

pub const READOUT_HIDE_DELAY: Duration = Duration::from_millis(300);
