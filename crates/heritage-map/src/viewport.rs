//! Camera state, screen breakpoints and animated transitions.

use heritage_core::config::AtlasSettings;
use heritage_core::models::{EntityId, LngLat};
use serde::Serialize;

use crate::style::marker_radius;

/// Fly-to speed used for every camera animation
const FLY_SPEED: f64 = 0.5;
/// Fly-to curve used for every camera animation
const FLY_CURVE: f64 = 1.0;
/// Duration of the zoom buttons' ease animation
const ZOOM_STEP_DURATION_MS: u64 = 1000;
/// Share of the screen height used to push a focused entity clear of the tablet panel
const TABLET_FOCUS_OFFSET: f64 = 0.30;

/// Screen dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Screen width class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Narrower than 688 px
    Mobile,
    /// 688 to 991 px
    Tablet,
    /// 992 px and wider
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: u32) -> Self {
        match width {
            0..=687 => Breakpoint::Mobile,
            688..=991 => Breakpoint::Tablet,
            _ => Breakpoint::Desktop,
        }
    }

    /// Zoom preset for the unfocused city view
    pub fn default_zoom(&self) -> f64 {
        match self {
            Breakpoint::Mobile => 11.5,
            Breakpoint::Tablet => 12.5,
            Breakpoint::Desktop => 13.5,
        }
    }
}

/// Camera state of the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// An animated camera move for the rendering surface to perform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTransition {
    pub center: LngLat,
    pub zoom: f64,
    /// Pixel offset of the target from the screen centre
    pub offset: [f64; 2],
    pub speed: Option<f64>,
    pub curve: Option<f64>,
    pub duration_ms: Option<u64>,
    /// Run even when the user prefers reduced motion
    pub essential: bool,
}

impl CameraTransition {
    /// Fly-to animation with the atlas' speed and curve
    pub fn fly_to(center: LngLat, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            offset: [0.0, 0.0],
            speed: Some(FLY_SPEED),
            curve: Some(FLY_CURVE),
            duration_ms: None,
            essential: true,
        }
    }

    /// Fixed-duration ease used by the zoom controls
    pub fn ease_to(center: LngLat, zoom: f64, duration_ms: u64) -> Self {
        Self {
            center,
            zoom,
            offset: [0.0, 0.0],
            speed: None,
            curve: None,
            duration_ms: Some(duration_ms),
            essential: false,
        }
    }

    pub fn with_offset(mut self, offset: [f64; 2]) -> Self {
        self.offset = offset;
        self
    }

    /// Camera state once the animation has finished
    pub fn target(&self) -> Viewport {
        Viewport::new(self.center, self.zoom)
    }
}

/// Tracks the camera and decides where it should go next
#[derive(Debug, Clone)]
pub struct ViewportController {
    settings: AtlasSettings,
    screen: ScreenSize,
    breakpoint: Breakpoint,
    camera: Viewport,
    focused: Option<EntityId>,
}

impl ViewportController {
    /// Start at the city centre with the breakpoint's zoom preset
    pub fn new(settings: AtlasSettings, screen: ScreenSize) -> Self {
        let breakpoint = Breakpoint::from_width(screen.width);
        Self {
            camera: Viewport::new(settings.city_center, breakpoint.default_zoom()),
            settings,
            screen,
            breakpoint,
            focused: None,
        }
    }

    pub fn camera(&self) -> Viewport {
        self.camera
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn focused(&self) -> Option<&EntityId> {
        self.focused.as_ref()
    }

    /// Record new screen dimensions.
    ///
    /// Returns a transition back to the city centre when no entity is focused
    /// and the width crossed into another breakpoint.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<CameraTransition> {
        self.screen = ScreenSize::new(width, height);
        let breakpoint = Breakpoint::from_width(width);
        if breakpoint == self.breakpoint {
            return None;
        }
        self.breakpoint = breakpoint;

        if self.focused.is_some() {
            return None;
        }

        tracing::debug!(?breakpoint, width, height, "Breakpoint changed");
        Some(self.apply(CameraTransition::fly_to(
            self.settings.city_center,
            breakpoint.default_zoom(),
        )))
    }

    /// Fly to an entity, offsetting it upward on tablets
    pub fn focus(&mut self, id: EntityId, location: LngLat) -> CameraTransition {
        let offset = match self.breakpoint {
            Breakpoint::Tablet => [0.0, f64::from(self.screen.height) * TABLET_FOCUS_OFFSET],
            _ => [0.0, 0.0],
        };
        self.focused = Some(id);
        self.apply(CameraTransition::fly_to(location, self.settings.focus_zoom).with_offset(offset))
    }

    /// Fly back to the city centre at the default zoom
    pub fn defocus(&mut self) -> CameraTransition {
        self.focused = None;
        self.apply(CameraTransition::fly_to(self.settings.city_center, self.settings.default_zoom))
    }

    /// Record a live zoom reading; true when the marker radius changes
    pub fn on_zoom(&mut self, zoom: f64) -> bool {
        let changed = marker_radius(zoom) != marker_radius(self.camera.zoom);
        self.camera.zoom = zoom;
        changed
    }

    /// Record a pan finished by the user
    pub fn on_move(&mut self, center: LngLat) {
        self.camera.center = center;
    }

    pub fn zoom_in(&mut self) -> CameraTransition {
        self.step_zoom(1.0)
    }

    pub fn zoom_out(&mut self) -> CameraTransition {
        self.step_zoom(-1.0)
    }

    fn step_zoom(&mut self, delta: f64) -> CameraTransition {
        let zoom = (self.camera.zoom + delta).clamp(0.0, 24.0);
        self.apply(CameraTransition::ease_to(self.camera.center, zoom, ZOOM_STEP_DURATION_MS))
    }

    /// Fly to a located user position
    pub fn fly_to_location(&mut self, location: LngLat) -> CameraTransition {
        self.apply(CameraTransition::fly_to(location, self.settings.geolocate_zoom))
    }

    fn apply(&mut self, transition: CameraTransition) -> CameraTransition {
        self.camera = transition.target();
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(width: u32, height: u32) -> ViewportController {
        ViewportController::new(AtlasSettings::default(), ScreenSize::new(width, height))
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(Breakpoint::from_width(320), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(687), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(688), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(991), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(992), Breakpoint::Desktop);
        assert_eq!(Breakpoint::Desktop.default_zoom(), 13.5);
        assert_eq!(Breakpoint::Tablet.default_zoom(), 12.5);
        assert_eq!(Breakpoint::Mobile.default_zoom(), 11.5);
    }

    #[test]
    fn test_initial_camera_uses_preset() {
        let viewport = controller(1280, 800);
        assert_eq!(viewport.camera().zoom, 13.5);
        assert_eq!(viewport.camera().center, LngLat::city_center());
    }

    #[test]
    fn test_resize_selects_preset_when_unfocused() {
        let mut viewport = controller(1280, 800);

        let transition = viewport.resize(800, 1000).expect("breakpoint changed");
        assert_eq!(transition.zoom, 12.5);
        assert_eq!(transition.center, LngLat::city_center());
        assert_eq!(viewport.camera().zoom, 12.5);

        assert!(viewport.resize(900, 1000).is_none());
        assert_eq!(viewport.screen(), ScreenSize::new(900, 1000));
    }

    #[test]
    fn test_resize_keeps_focused_camera() {
        let mut viewport = controller(1280, 800);
        viewport.focus(EntityId::from("w1"), LngLat::new(35.5, 33.9));

        assert!(viewport.resize(400, 800).is_none());
        assert_eq!(viewport.camera().zoom, 16.0);
        assert_eq!(viewport.breakpoint(), Breakpoint::Mobile);
    }

    #[test]
    fn test_focus_offsets_only_on_tablet() {
        let location = LngLat::new(35.5, 33.9);

        let desktop = controller(1280, 800).focus(EntityId::from("w1"), location);
        assert_eq!(desktop.offset, [0.0, 0.0]);
        assert_eq!(desktop.zoom, 16.0);
        assert_eq!(desktop.speed, Some(0.5));
        assert_eq!(desktop.curve, Some(1.0));
        assert!(desktop.essential);

        let tablet = controller(800, 1000).focus(EntityId::from("w1"), location);
        assert_eq!(tablet.offset, [0.0, 300.0]);
    }

    #[test]
    fn test_defocus_returns_to_city_center() {
        let mut viewport = controller(1280, 800);
        viewport.focus(EntityId::from("w1"), LngLat::new(35.5, 33.9));

        let transition = viewport.defocus();

        assert_eq!(transition.center, LngLat::new(35.510, 33.893894));
        assert_eq!(transition.zoom, 13.25);
        assert!(viewport.focused().is_none());
    }

    #[test]
    fn test_on_zoom_reports_radius_change() {
        let mut viewport = controller(1280, 800);

        assert!(!viewport.on_zoom(13.6));
        assert!(viewport.on_zoom(14.2));
        assert!(!viewport.on_zoom(18.0));
        assert!(viewport.on_zoom(12.0));
    }

    #[test]
    fn test_zoom_controls() {
        let mut viewport = controller(1280, 800);

        let zoom_in = viewport.zoom_in();
        assert_eq!(zoom_in.zoom, 14.5);
        assert_eq!(zoom_in.duration_ms, Some(1000));

        let zoom_out = viewport.zoom_out();
        assert_eq!(zoom_out.zoom, 13.5);
    }

    #[test]
    fn test_fly_to_location_uses_high_zoom() {
        let mut viewport = controller(1280, 800);
        let transition = viewport.fly_to_location(LngLat::new(35.49, 33.88));
        assert_eq!(transition.zoom, 20.0);
        assert_eq!(viewport.camera().center, LngLat::new(35.49, 33.88));
    }
}
