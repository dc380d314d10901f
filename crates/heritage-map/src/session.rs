//! Map session: owns the marker set between `open` and `close`.

use heritage_core::config::AtlasSettings;
use heritage_core::models::{EntityId, FilterCriteria, GeoEntity, LngLat};
use heritage_core::{HeritageError, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::layers::{LayerControl, LayerVisibility};
use crate::markers::{self, MarkerDelta, MarkerEvent, MarkerSet, RenderReport};
use crate::style::marker_radius;
use crate::viewport::{CameraTransition, ScreenSize, Viewport, ViewportController};

/// Lifecycle state of a [`MapSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Rebuilding,
    Closed,
}

/// Result of one rebuild
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutcome {
    pub delta: MarkerDelta,
    pub report: RenderReport,
}

/// Changes queued since the last flush
#[derive(Debug, Default)]
struct PendingChanges {
    entities: Option<Vec<GeoEntity>>,
    criteria: Option<FilterCriteria>,
    viewport_dirty: bool,
}

impl PendingChanges {
    fn is_empty(&self) -> bool {
        self.entities.is_none() && self.criteria.is_none() && !self.viewport_dirty
    }
}

/// Keeps markers consistent with entities, criteria and the camera.
///
/// Changes are queued with the `set_*` methods and applied together by
/// [`MapSession::flush`], which the UI adapter calls once per frame.
///
/// Rebuilds run synchronously under `&mut self`, so the borrow checker already
/// rules out re-entry. The [`SessionState::Rebuilding`] check in the rebuild
/// path is a backstop: [`HeritageError::RebuildInProgress`] is unreachable
/// through the public API.
#[derive(Debug)]
pub struct MapSession {
    id: Uuid,
    state: SessionState,
    entities: Vec<GeoEntity>,
    criteria: FilterCriteria,
    viewport: ViewportController,
    markers: MarkerSet,
    hovered: Option<EntityId>,
    pending: PendingChanges,
    resize_listener: bool,
    layers: LayerControl,
    last_report: RenderReport,
}

impl MapSession {
    /// Open a session and register its resize listener
    pub fn open(settings: AtlasSettings, screen: ScreenSize) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, width = screen.width, height = screen.height, "Map session opened");

        Self {
            id,
            state: SessionState::Idle,
            entities: Vec::new(),
            criteria: FilterCriteria::default(),
            viewport: ViewportController::new(settings, screen),
            markers: MarkerSet::new(),
            hovered: None,
            pending: PendingChanges::default(),
            resize_listener: true,
            layers: LayerControl::default(),
            last_report: RenderReport::default(),
        }
    }

    /// Make historical overlay layers available
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.layers = LayerControl::new(layers);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn entities(&self) -> &[GeoEntity] {
        &self.entities
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn layers(&self) -> &LayerControl {
        &self.layers
    }

    pub fn last_report(&self) -> &RenderReport {
        &self.last_report
    }

    pub fn hovered(&self) -> Option<&EntityId> {
        self.hovered.as_ref()
    }

    pub fn is_listening_for_resize(&self) -> bool {
        self.resize_listener
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Closed => Err(HeritageError::SessionClosed),
            _ => Ok(()),
        }
    }

    /// Replace every input and rebuild immediately
    pub fn render(
        &mut self,
        entities: Vec<GeoEntity>,
        criteria: FilterCriteria,
        viewport: Viewport,
    ) -> Result<RenderOutcome> {
        self.ensure_open()?;
        criteria.validate()?;

        self.entities = entities;
        self.criteria = criteria;
        self.viewport.on_move(viewport.center);
        self.viewport.on_zoom(viewport.zoom);
        self.pending = PendingChanges::default();

        self.rebuild()
    }

    /// Queue a new entity snapshot
    pub fn set_entities(&mut self, entities: Vec<GeoEntity>) -> Result<()> {
        self.ensure_open()?;
        self.pending.entities = Some(entities);
        Ok(())
    }

    /// Queue new filter criteria
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<()> {
        self.ensure_open()?;
        criteria.validate()?;
        self.pending.criteria = Some(criteria);
        Ok(())
    }

    /// Record a camera position reported by the rendering surface
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.ensure_open()?;
        self.viewport.on_move(viewport.center);
        self.on_zoom(viewport.zoom)
    }

    /// Record a live zoom reading; marks markers dirty when their radius changes
    pub fn on_zoom(&mut self, zoom: f64) -> Result<()> {
        self.ensure_open()?;
        if self.viewport.on_zoom(zoom) {
            self.pending.viewport_dirty = true;
        }
        Ok(())
    }

    /// Handle a window resize; ignored once the listener is deregistered
    pub fn resize(&mut self, width: u32, height: u32) -> Option<CameraTransition> {
        if !self.resize_listener {
            tracing::debug!(session_id = %self.id, "Resize ignored, listener removed");
            return None;
        }

        let before = self.viewport.camera().zoom;
        let transition = self.viewport.resize(width, height);
        self.track_zoom(before);
        transition
    }

    /// Apply every queued change in a single rebuild
    pub fn flush(&mut self) -> Result<Option<RenderOutcome>> {
        self.ensure_open()?;
        if self.pending.is_empty() {
            return Ok(None);
        }

        let pending = std::mem::take(&mut self.pending);
        if let Some(entities) = pending.entities {
            self.entities = entities;
        }
        if let Some(criteria) = pending.criteria {
            self.criteria = criteria;
        }

        self.rebuild().map(Some)
    }

    fn rebuild(&mut self) -> Result<RenderOutcome> {
        // Unreachable while rebuilds stay synchronous
        if self.state == SessionState::Rebuilding {
            return Err(HeritageError::RebuildInProgress);
        }
        self.state = SessionState::Rebuilding;

        let (next, report) = markers::render(&self.entities, &self.criteria, &self.viewport.camera());
        let delta = self.markers.diff(&next);

        if let Some(hovered) = &self.hovered {
            if !next.contains(hovered) {
                self.hovered = None;
            }
        }

        self.markers = next;
        self.last_report = report.clone();
        self.state = SessionState::Idle;

        tracing::debug!(
            session_id = %self.id,
            created = delta.created.len(),
            updated = delta.updated.len(),
            removed = delta.removed.len(),
            visible = report.visible,
            skipped = report.skipped.len(),
            "Markers rebuilt"
        );

        Ok(RenderOutcome { delta, report })
    }

    fn track_zoom(&mut self, before: f64) {
        if marker_radius(before) != marker_radius(self.viewport.camera().zoom) {
            self.pending.viewport_dirty = true;
        }
    }

    /// Fly to an entity that currently has a marker
    pub fn focus(&mut self, id: &EntityId) -> Result<CameraTransition> {
        self.ensure_open()?;

        let entity = self
            .entities
            .iter()
            .find(|entity| &entity.id == id)
            .ok_or_else(|| HeritageError::EntityNotFound { id: id.to_string() })?;
        let location = self
            .markers
            .get(id)
            .map(|marker| marker.position)
            .ok_or_else(|| HeritageError::MarkerNotFound { id: entity.id.to_string() })?;

        let before = self.viewport.camera().zoom;
        let transition = self.viewport.focus(id.clone(), location);
        self.track_zoom(before);
        Ok(transition)
    }

    /// Return to the city view
    pub fn defocus(&mut self) -> Result<CameraTransition> {
        self.ensure_open()?;
        let before = self.viewport.camera().zoom;
        let transition = self.viewport.defocus();
        self.track_zoom(before);
        Ok(transition)
    }

    pub fn zoom_in(&mut self) -> Result<CameraTransition> {
        self.ensure_open()?;
        let before = self.viewport.camera().zoom;
        let transition = self.viewport.zoom_in();
        self.track_zoom(before);
        Ok(transition)
    }

    pub fn zoom_out(&mut self) -> Result<CameraTransition> {
        self.ensure_open()?;
        let before = self.viewport.camera().zoom;
        let transition = self.viewport.zoom_out();
        self.track_zoom(before);
        Ok(transition)
    }

    /// Fly to a position returned by geolocation
    pub fn fly_to_location(&mut self, location: LngLat) -> Result<CameraTransition> {
        self.ensure_open()?;
        let before = self.viewport.camera().zoom;
        let transition = self.viewport.fly_to_location(location);
        self.track_zoom(before);
        Ok(transition)
    }

    pub fn set_layer(&mut self, layer: Option<&str>) -> Result<Vec<LayerVisibility>> {
        self.ensure_open()?;
        self.layers.set_layer(layer)
    }

    /// Click on a marker
    pub fn click(&self, id: &EntityId) -> Result<MarkerEvent> {
        self.ensure_open()?;
        let marker = self
            .markers
            .get(id)
            .ok_or_else(|| HeritageError::MarkerNotFound { id: id.to_string() })?;

        tracing::debug!(session_id = %self.id, id = %id, kind = %marker.kind, "Marker clicked");
        Ok(MarkerEvent::Click { id: marker.id.clone(), kind: marker.kind })
    }

    /// Pointer entered a marker; leaves the previously hovered one first
    pub fn hover_enter(&mut self, id: &EntityId) -> Result<Vec<MarkerEvent>> {
        self.ensure_open()?;
        let marker = self
            .markers
            .get(id)
            .ok_or_else(|| HeritageError::MarkerNotFound { id: id.to_string() })?;
        let enter =
            MarkerEvent::HoverEnter { id: marker.id.clone(), highlight_key: marker.highlight_key };

        let mut events = Vec::with_capacity(2);
        match self.hovered.take() {
            Some(previous) if &previous == id => {
                self.hovered = Some(previous);
                return Ok(events);
            }
            Some(previous) => {
                if let Some(leave) = self.leave_event(&previous) {
                    events.push(leave);
                }
            }
            None => {}
        }

        events.push(enter);
        self.hovered = Some(id.clone());
        Ok(events)
    }

    /// Pointer left a marker
    pub fn hover_leave(&mut self, id: &EntityId) -> Result<Option<MarkerEvent>> {
        self.ensure_open()?;
        if self.hovered.as_ref() != Some(id) {
            return Ok(None);
        }
        self.hovered = None;
        Ok(self.leave_event(id))
    }

    fn leave_event(&self, id: &EntityId) -> Option<MarkerEvent> {
        self.markers.get(id).map(|marker| MarkerEvent::HoverLeave {
            id: marker.id.clone(),
            highlight_key: marker.highlight_key,
        })
    }

    /// Tear down every marker and deregister the resize listener
    pub fn close(&mut self) -> Result<MarkerDelta> {
        self.ensure_open()?;

        let delta = self.markers.teardown();
        self.markers = MarkerSet::new();
        self.hovered = None;
        self.pending = PendingChanges::default();
        self.resize_listener = false;
        self.state = SessionState::Closed;

        tracing::info!(session_id = %self.id, removed = delta.removed.len(), "Map session closed");
        Ok(delta)
    }
}
