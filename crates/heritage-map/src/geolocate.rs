//! User geolocation with a single in-flight request and a status dialog.

use async_trait::async_trait;
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use heritage_core::models::LngLat;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Why a geolocation request did not produce a position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this platform")]
    Unsupported,

    #[error("Geolocation permission was denied")]
    Denied,

    #[error("Geolocation failed: {0}")]
    Error(String),

    #[error("A geolocation request is already in flight")]
    Busy,

    #[error("Geolocation request was cancelled")]
    Cancelled,
}

impl GeolocationError {
    /// Short reason code reported to callers
    pub fn reason_code(&self) -> &'static str {
        match self {
            GeolocationError::Unsupported => "unsupported",
            GeolocationError::Denied => "denied",
            GeolocationError::Error(_) => "error",
            GeolocationError::Busy => "busy",
            GeolocationError::Cancelled => "cancelled",
        }
    }
}

/// Platform location service
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Whether the platform exposes a location service at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Resolve the device's current position
    async fn current_position(&self) -> Result<LngLat, GeolocationError>;
}

/// Where the geolocation flow currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum GeolocateStatus {
    Idle,
    Requesting,
    Located(LngLat),
    Failed(GeolocationError),
}

/// Which copy the status dialog shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogVariant {
    InProgress,
    Unsupported,
    Error,
}

/// User-facing geolocation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDialog {
    pub variant: DialogVariant,
    pub title: &'static str,
    pub message: &'static str,
    pub loading: bool,
}

impl StatusDialog {
    pub fn in_progress() -> Self {
        Self {
            variant: DialogVariant::InProgress,
            title: "Geolocation in process",
            message: "Loading...",
            loading: true,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            variant: DialogVariant::Unsupported,
            title: "Geolocation is not supported!",
            message: "Please make sure location services and access are enabled in your system's and browser's settings.",
            loading: false,
        }
    }

    pub fn error() -> Self {
        Self {
            variant: DialogVariant::Error,
            title: "We couldn't find you!",
            message: "There was an error. Please make sure location services and access are enabled in your system's and browser's settings.",
            loading: false,
        }
    }
}

#[derive(Debug)]
struct GeolocatorState {
    status: GeolocateStatus,
    dialog: Option<StatusDialog>,
    abort: Option<AbortHandle>,
}

fn lock_state(state: &Mutex<GeolocatorState>) -> MutexGuard<'_, GeolocatorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the geolocator to idle if a request future is dropped mid-flight
struct InFlight<'a> {
    state: &'a Mutex<GeolocatorState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock_state(self.state);
        if state.status == GeolocateStatus::Requesting {
            tracing::debug!("Geolocation request dropped before completion");
            state.status = GeolocateStatus::Idle;
            state.dialog = None;
            state.abort = None;
        }
    }
}

/// Runs geolocation requests against a [`PositionProvider`].
///
/// Clones share state, so a clone held by a teardown hook can cancel the
/// request another clone is awaiting.
pub struct Geolocator<P> {
    provider: Arc<P>,
    state: Arc<Mutex<GeolocatorState>>,
}

impl<P> Clone for Geolocator<P> {
    fn clone(&self) -> Self {
        Self { provider: Arc::clone(&self.provider), state: Arc::clone(&self.state) }
    }
}

impl<P: PositionProvider> Geolocator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            state: Arc::new(Mutex::new(GeolocatorState {
                status: GeolocateStatus::Idle,
                dialog: None,
                abort: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GeolocatorState> {
        lock_state(&self.state)
    }

    /// Request the user's position.
    ///
    /// Only one request may be in flight; a second call fails with
    /// [`GeolocationError::Busy`] and leaves the first untouched. The loading
    /// flag is cleared on every outcome, including when the returned future
    /// is dropped before it completes.
    pub async fn geolocate(&self) -> Result<LngLat, GeolocationError> {
        let registration = self.begin()?;
        let mut in_flight = InFlight { state: &self.state, armed: true };

        let result = match Abortable::new(self.provider.current_position(), registration).await {
            Ok(result) => result,
            Err(_aborted) => Err(GeolocationError::Cancelled),
        };

        in_flight.disarm();
        self.finish(&result);
        result
    }

    fn begin(&self) -> Result<AbortRegistration, GeolocationError> {
        let mut state = self.lock();

        if state.status == GeolocateStatus::Requesting {
            tracing::warn!("Geolocation already in flight, request rejected");
            return Err(GeolocationError::Busy);
        }

        if !self.provider.is_supported() {
            tracing::info!("Geolocation is not supported");
            state.status = GeolocateStatus::Failed(GeolocationError::Unsupported);
            state.dialog = Some(StatusDialog::unsupported());
            return Err(GeolocationError::Unsupported);
        }

        let (handle, registration) = AbortHandle::new_pair();
        state.status = GeolocateStatus::Requesting;
        state.dialog = Some(StatusDialog::in_progress());
        state.abort = Some(handle);
        tracing::debug!("Geolocation requested");

        Ok(registration)
    }

    fn finish(&self, result: &Result<LngLat, GeolocationError>) {
        let mut state = self.lock();
        state.abort = None;

        match result {
            Ok(position) => {
                tracing::info!(lng = position.lng, lat = position.lat, "User located");
                state.status = GeolocateStatus::Located(*position);
                state.dialog = None;
            }
            Err(GeolocationError::Cancelled) => {
                tracing::debug!("Geolocation cancelled");
                state.status = GeolocateStatus::Idle;
                state.dialog = None;
            }
            Err(err) => {
                tracing::warn!(reason = err.reason_code(), error = %err, "Geolocation failed");
                state.dialog = Some(match err {
                    GeolocationError::Unsupported => StatusDialog::unsupported(),
                    _ => StatusDialog::error(),
                });
                state.status = GeolocateStatus::Failed(err.clone());
            }
        }
    }

    /// Abort the in-flight request, if any. Returns true when one was aborted.
    pub fn cancel(&self) -> bool {
        match self.lock().abort.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn status(&self) -> GeolocateStatus {
        self.lock().status.clone()
    }

    pub fn dialog(&self) -> Option<StatusDialog> {
        self.lock().dialog.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().dialog.as_ref().is_some_and(|dialog| dialog.loading)
    }

    /// Close a terminal dialog; the in-progress dialog stays until completion
    pub fn dismiss_dialog(&self) {
        let mut state = self.lock();
        if state.status != GeolocateStatus::Requesting {
            state.dialog = None;
        }
    }
}
