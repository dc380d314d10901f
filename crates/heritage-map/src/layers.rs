//! Historical map overlays, at most one visible at a time.

use heritage_core::{HeritageError, Result};
use serde::Serialize;

/// Visibility change to apply to one overlay layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerVisibility {
    pub layer: String,
    pub visible: bool,
}

impl LayerVisibility {
    fn shown(layer: &str) -> Self {
        Self { layer: layer.to_string(), visible: true }
    }

    fn hidden(layer: &str) -> Self {
        Self { layer: layer.to_string(), visible: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayerControl {
    available: Vec<String>,
    active: Option<String>,
}

impl LayerControl {
    pub fn new(available: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { available: available.into_iter().map(Into::into).collect(), active: None }
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Show `layer` and hide the previous one; `None` resets to the base map
    pub fn set_layer(&mut self, layer: Option<&str>) -> Result<Vec<LayerVisibility>> {
        if let Some(name) = layer {
            if !self.available.iter().any(|available| available == name) {
                return Err(HeritageError::LayerNotFound { name: name.to_string() });
            }
        }

        if self.active.as_deref() == layer {
            return Ok(Vec::new());
        }

        let mut changes = Vec::with_capacity(2);
        if let Some(previous) = self.active.take() {
            changes.push(LayerVisibility::hidden(&previous));
        }
        if let Some(name) = layer {
            changes.push(LayerVisibility::shown(name));
            self.active = Some(name.to_string());
        }

        tracing::debug!(active = ?self.active, "Map layer changed");
        Ok(changes)
    }
}
