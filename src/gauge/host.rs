use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct EntityId(String);

crate::impl_string_newtype!(EntityId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct EntityState(String);

crate::impl_string_newtype!(EntityState);

impl EntityState {
    pub fn is_on(&self) -> bool {
        self.0.eq_ignore_ascii_case("on")
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct NavigationPath(String);

crate::impl_string_newtype!(NavigationPath);

/// What the state source knows about one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity: EntityId,
    pub state: EntityState,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<PathBuf>,
}

impl EntitySnapshot {
    pub fn new(entity: EntityId, state: EntityState, value: Option<f64>) -> Self {
        Self {
            entity,
            state,
            value,
            name: None,
            picture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetValue {
        target: EntityId,
        value: f64,
    },
    TurnOn {
        target: EntityId,
    },
    TurnOff {
        target: EntityId,
    },
    Toggle {
        target: EntityId,
    },
    Custom {
        domain: String,
        service: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

/// Notifications for the embedding host rather than the entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    ShowDetail { entity: EntityId },
    Navigate { path: NavigationPath },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct FrameToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct TimerToken(u64);

/// Frame and timer primitives of the host event loop. Fired handles are fed
/// back through `Control::frame` and `Control::timer_fired`.
pub trait Scheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
    fn start_timer(&mut self, delay: Duration) -> TimerToken;
    fn cancel_timer(&mut self, token: TimerToken);
}

pub trait CommandSink {
    fn send(&mut self, command: Command);
}

pub trait StateSource {
    fn entity(&self, id: &EntityId) -> Option<&EntitySnapshot>;
}
