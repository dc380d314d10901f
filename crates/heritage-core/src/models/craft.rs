//! Coarse craft categories used for marker colouring and filtering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HeritageError;

/// Fill colour for entities without any craft category
pub const NEUTRAL_COLOR: &str = "#c9bba6";

/// Highlight key for entities without any craft category
pub const NEUTRAL_KEY: &str = "none";

/// One of the seven coarse craft groupings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CraftCategory {
    Architectural,
    Cuisine,
    Decorative,
    Fashion,
    Functional,
    Furniture,
    Textiles,
}

impl CraftCategory {
    /// Every known category, in display order
    pub const ALL: [CraftCategory; 7] = [
        CraftCategory::Architectural,
        CraftCategory::Cuisine,
        CraftCategory::Decorative,
        CraftCategory::Fashion,
        CraftCategory::Functional,
        CraftCategory::Furniture,
        CraftCategory::Textiles,
    ];

    /// Lowercase slug, also used as the hover highlight key
    pub fn as_str(&self) -> &'static str {
        match self {
            CraftCategory::Architectural => "architectural",
            CraftCategory::Cuisine => "cuisine",
            CraftCategory::Decorative => "decorative",
            CraftCategory::Fashion => "fashion",
            CraftCategory::Functional => "functional",
            CraftCategory::Furniture => "furniture",
            CraftCategory::Textiles => "textiles",
        }
    }

    /// Marker fill colour as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            CraftCategory::Architectural => "#91B0D1",
            CraftCategory::Cuisine => "#DFBA96",
            CraftCategory::Decorative => "#88A384",
            CraftCategory::Fashion => "#DEC2B4",
            CraftCategory::Functional => "#72A1AB",
            CraftCategory::Furniture => "#9F8278",
            CraftCategory::Textiles => "#EACC74",
        }
    }
}

impl fmt::Display for CraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CraftCategory {
    type Err = HeritageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "architectural" => Ok(CraftCategory::Architectural),
            "cuisine" => Ok(CraftCategory::Cuisine),
            "decorative" => Ok(CraftCategory::Decorative),
            "fashion" => Ok(CraftCategory::Fashion),
            "functional" => Ok(CraftCategory::Functional),
            "furniture" => Ok(CraftCategory::Furniture),
            "textiles" => Ok(CraftCategory::Textiles),
            _ => Err(HeritageError::UnknownCraftCategory { value: s.to_string() }),
        }
    }
}
