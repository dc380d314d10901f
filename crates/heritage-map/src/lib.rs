//! Heritage Map - Filtering, marker lifecycle, and viewport control
//!
//! This crate decides which markers exist on the atlas map, how they look,
//! and where the camera goes. Rendering surfaces consume the marker deltas and
//! camera transitions it produces.

pub mod filter;
pub mod geolocate;
pub mod layers;
pub mod markers;
pub mod minimap;
pub mod session;
pub mod style;
pub mod viewport;

pub use filter::{compute_visible_set, matches, VisibleSet};
pub use geolocate::{
    DialogVariant, GeolocateStatus, GeolocationError, Geolocator, PositionProvider, StatusDialog,
};
pub use layers::{LayerControl, LayerVisibility};
pub use markers::{
    render, MarkerDelta, MarkerDescriptor, MarkerEvent, MarkerSet, RenderReport, SkipReason,
    SkippedEntity,
};
pub use minimap::{MiniMapView, MiniMarker, MINI_MAP_ZOOM};
pub use session::{MapSession, RenderOutcome, SessionState};
pub use style::{compute_marker_style, marker_radius, MarkerFill, MarkerStyle};
pub use viewport::{Breakpoint, CameraTransition, ScreenSize, Viewport, ViewportController};
