use crate::gauge::{EntityId, EntitySnapshot};

#[derive(Debug, Clone)]
pub enum AppEvent {
    EntityUpdate(EntitySnapshot),
    EntityRemoved(EntityId),
    ConfigReload,
}
