//! Entity source reading exported JSON payloads from disk.

use async_trait::async_trait;
use heritage_core::models::GeoEntity;
use heritage_core::ports::EntitySource;
use heritage_core::{HeritageError, Result};
use std::path::{Path, PathBuf};

use crate::payload::{parse_archives, parse_workshops};

/// Reads `{"response": [...]}` payloads saved from the list endpoints.
///
/// Files are re-read on every call, so a refreshed export is picked up by the
/// next snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    workshops_path: PathBuf,
    archives_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(workshops_path: impl Into<PathBuf>, archives_path: impl Into<PathBuf>) -> Self {
        Self { workshops_path: workshops_path.into(), archives_path: archives_path.into() }
    }

    /// Use `workshops.json` and `archives.json` inside `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("workshops.json"), dir.join("archives.json"))
    }

    async fn read(path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path).await.map_err(|e| HeritageError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl EntitySource for JsonFileSource {
    async fn workshops(&self) -> Result<Vec<GeoEntity>> {
        let json = Self::read(&self.workshops_path).await?;
        parse_workshops(&json)
    }

    async fn archives(&self) -> Result<Vec<GeoEntity>> {
        let json = Self::read(&self.archives_path).await?;
        parse_archives(&json)
    }
}
