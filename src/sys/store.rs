use crate::gauge::{EntityId, EntitySnapshot, StateSource};
use std::collections::HashMap;

/// Latest snapshot per entity, as reported over the bridge.
#[derive(Debug, Default)]
pub struct StateStore {
    entities: HashMap<EntityId, EntitySnapshot>,
}

impl StateStore {
    /// Returns false when the snapshot is identical to the stored one.
    pub fn upsert(&mut self, snapshot: EntitySnapshot) -> bool {
        if self.entities.get(&snapshot.entity) == Some(&snapshot) {
            return false;
        }
        self.entities.insert(snapshot.entity.clone(), snapshot);
        true
    }

    pub fn remove(&mut self, entity: &EntityId) -> bool {
        self.entities.remove(entity).is_some()
    }
}

impl StateSource for StateStore {
    fn entity(&self, id: &EntityId) -> Option<&EntitySnapshot> {
        self.entities.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::host::EntityState;

    fn snap(id: &str, value: f64) -> EntitySnapshot {
        EntitySnapshot::new(EntityId::new(id), EntityState::new("on"), Some(value))
    }

    #[test]
    fn test_upsert_reports_changes() {
        let mut store = StateStore::default();
        assert!(store.upsert(snap("light.a", 1.0)));
        assert!(!store.upsert(snap("light.a", 1.0)));
        assert!(store.upsert(snap("light.a", 2.0)));
        assert!(store.upsert(snap("light.b", 2.0)));
        assert!(store.entity(&EntityId::new("light.b")).is_some());
        assert_eq!(
            store.entity(&EntityId::new("light.a")).and_then(|s| s.value),
            Some(2.0)
        );
    }

    #[test]
    fn test_remove() {
        let mut store = StateStore::default();
        store.upsert(snap("light.a", 1.0));
        assert!(store.remove(&EntityId::new("light.a")));
        assert!(!store.remove(&EntityId::new("light.a")));
        assert!(store.entity(&EntityId::new("light.a")).is_none());
    }
}
