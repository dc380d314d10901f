//! Marker appearance derived from craft categories and zoom.

use heritage_core::models::{CraftCategory, GeoEntity, NEUTRAL_COLOR};
use serde::Serialize;

/// Marker radius in pixels for a zoom level.
///
/// Step function with bins at 12.5, 13, 13.5, 13.75 and 14.
pub fn marker_radius(zoom: f64) -> f64 {
    if zoom < 12.5 {
        2.0
    } else if zoom < 13.0 {
        4.0
    } else if zoom < 13.5 {
        5.0
    } else if zoom < 13.75 {
        6.0
    } else if zoom < 14.0 {
        7.0
    } else {
        7.5
    }
}

/// How a marker is filled.
///
/// At most two categories are drawn: a marker is split vertically into two
/// halves when an entity has two or more categories, and any category after
/// the second is not represented. Filtering still considers every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerFill {
    /// No category: neutral colour
    Neutral,
    /// A single category colour
    Solid { category: CraftCategory },
    /// Left half, right half
    Split { left: CraftCategory, right: CraftCategory },
}

impl MarkerFill {
    /// Derive the fill from an ordered category list
    pub fn from_categories(categories: &[CraftCategory]) -> Self {
        match categories {
            [] => MarkerFill::Neutral,
            [only] => MarkerFill::Solid { category: *only },
            [left, right, ..] if left == right => MarkerFill::Solid { category: *left },
            [left, right, ..] => MarkerFill::Split { left: *left, right: *right },
        }
    }

    /// Hex colours, left to right
    pub fn colors(&self) -> Vec<&'static str> {
        match self {
            MarkerFill::Neutral => vec![NEUTRAL_COLOR],
            MarkerFill::Solid { category } => vec![category.color()],
            MarkerFill::Split { left, right } => vec![left.color(), right.color()],
        }
    }
}

/// Visual state of one marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub fill: MarkerFill,
    pub radius: f64,
}

impl MarkerStyle {
    /// Marker width and height
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    /// Width of each coloured segment; split markers use half the diameter per side
    pub fn segment_width(&self) -> f64 {
        match self.fill {
            MarkerFill::Split { .. } => self.radius,
            _ => self.diameter(),
        }
    }
}

/// Compute the style of an entity's marker at a zoom level
pub fn compute_marker_style(entity: &GeoEntity, zoom: f64) -> MarkerStyle {
    MarkerStyle {
        fill: MarkerFill::from_categories(&entity.craft_categories),
        radius: marker_radius(zoom),
    }
}
