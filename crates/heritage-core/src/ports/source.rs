use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EntityId, GeoEntity};

/// Port for reading verified workshop and archive records
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// All verified workshops
    async fn workshops(&self) -> Result<Vec<GeoEntity>>;

    /// All verified archive records
    async fn archives(&self) -> Result<Vec<GeoEntity>>;

    /// Workshops followed by archives, the order the map renders them in
    async fn snapshot(&self) -> Result<Vec<GeoEntity>> {
        let mut entities = self.workshops().await?;
        entities.extend(self.archives().await?);
        Ok(entities)
    }

    /// Look up a single entity in either collection
    async fn get(&self, id: &EntityId) -> Result<Option<GeoEntity>> {
        Ok(self.snapshot().await?.into_iter().find(|entity| &entity.id == id))
    }
}
