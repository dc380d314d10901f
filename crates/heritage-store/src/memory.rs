//! In-memory entity source for development and testing.

use async_trait::async_trait;
use heritage_core::models::{EntityKind, GeoEntity};
use heritage_core::ports::EntitySource;
use heritage_core::Result;
use std::sync::{Arc, PoisonError, RwLock};

/// Entity source backed by shared vectors
#[derive(Debug, Clone, Default)]
pub struct MemoryEntitySource {
    workshops: Arc<RwLock<Vec<GeoEntity>>>,
    archives: Arc<RwLock<Vec<GeoEntity>>>,
}

impl MemoryEntitySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `entities`, split by kind
    pub fn with_entities(entities: impl IntoIterator<Item = GeoEntity>) -> Self {
        let source = Self::new();
        for entity in entities {
            source.insert(entity);
        }
        source
    }

    fn collection(&self, kind: EntityKind) -> &RwLock<Vec<GeoEntity>> {
        match kind {
            EntityKind::Workshop => self.workshops.as_ref(),
            EntityKind::Archive => self.archives.as_ref(),
        }
    }

    /// Add an entity, replacing any entity with the same id and kind
    pub fn insert(&self, entity: GeoEntity) {
        let mut collection =
            self.collection(entity.kind).write().unwrap_or_else(PoisonError::into_inner);
        match collection.iter_mut().find(|existing| existing.id == entity.id) {
            Some(existing) => *existing = entity,
            None => collection.push(entity),
        }
    }

    /// Replace a whole collection, as a refreshed API response would
    pub fn replace(&self, kind: EntityKind, entities: Vec<GeoEntity>) {
        *self.collection(kind).write().unwrap_or_else(PoisonError::into_inner) = entities;
    }

    pub fn len(&self) -> usize {
        self.read(EntityKind::Workshop).len() + self.read(EntityKind::Archive).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, kind: EntityKind) -> Vec<GeoEntity> {
        self.collection(kind).read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl EntitySource for MemoryEntitySource {
    async fn workshops(&self) -> Result<Vec<GeoEntity>> {
        Ok(self.read(EntityKind::Workshop))
    }

    async fn archives(&self) -> Result<Vec<GeoEntity>> {
        Ok(self.read(EntityKind::Archive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_core::models::EntityId;

    #[tokio::test]
    async fn test_snapshot_lists_workshops_first() {
        let source = MemoryEntitySource::with_entities([
            GeoEntity::archive("a1"),
            GeoEntity::workshop("w1"),
            GeoEntity::workshop("w2"),
        ]);

        let ids: Vec<_> =
            source.snapshot().await.unwrap().into_iter().map(|e| e.id.0).collect();

        assert_eq!(ids, vec!["w1", "w2", "a1"]);
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let source = MemoryEntitySource::new();
        source.insert(GeoEntity::workshop("w1"));
        source.insert(GeoEntity::workshop("w1").with_images(true));

        assert_eq!(source.len(), 1);
        let entity = source.get(&EntityId::from("w1")).await.unwrap().expect("entity");
        assert!(entity.has_images);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let source = MemoryEntitySource::new();
        let view = source.clone();

        source.replace(EntityKind::Archive, vec![GeoEntity::archive("a1")]);

        assert_eq!(view.archives().await.unwrap().len(), 1);
        assert!(view.get(&EntityId::from("missing")).await.unwrap().is_none());
    }
}
