//! Filter criteria snapshot consumed by each filtering pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::craft::CraftCategory;
use crate::error::{HeritageError, Result};

/// Which craft categories the user wants to see.
///
/// `Unfiltered` and `Only(all seven)` are deliberately different: the former
/// imposes no category constraint and therefore also admits entities without
/// any category, while the latter requires at least one category to match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "categories", rename_all = "snake_case")]
pub enum CategorySelection {
    /// No category constraint
    #[default]
    Unfiltered,
    /// Entities must carry at least one of these categories
    Only(BTreeSet<CraftCategory>),
}

impl CategorySelection {
    /// Select every known category explicitly
    pub fn all() -> Self {
        CategorySelection::Only(CraftCategory::ALL.into_iter().collect())
    }

    /// Select the given categories
    pub fn only(categories: impl IntoIterator<Item = CraftCategory>) -> Self {
        CategorySelection::Only(categories.into_iter().collect())
    }

    /// Check whether an entity's categories satisfy the selection
    pub fn admits(&self, categories: &[CraftCategory]) -> bool {
        match self {
            CategorySelection::Unfiltered => true,
            CategorySelection::Only(selected) => {
                categories.iter().any(|category| selected.contains(category))
            }
        }
    }
}

/// Inclusive year interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Inclusive at both bounds
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(1890, 2030)
    }
}

/// Multi-criteria map filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Craft category selection
    #[serde(default)]
    pub categories: CategorySelection,

    /// Inclusive year interval
    #[serde(default)]
    pub year_range: YearRange,

    /// Only show entities whose status is `open`
    #[serde(default)]
    pub only_open: bool,

    /// Case-insensitive name prefix; empty means no text constraint
    #[serde(default)]
    pub search_text: String,
}

impl FilterCriteria {
    /// Create criteria that admit everything within the default year range
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category selection
    pub fn with_categories(mut self, categories: CategorySelection) -> Self {
        self.categories = categories;
        self
    }

    /// Set the inclusive year range
    pub fn with_year_range(mut self, start: i32, end: i32) -> Self {
        self.year_range = YearRange::new(start, end);
        self
    }

    /// Enable or disable the open-only constraint
    pub fn with_only_open(mut self, only_open: bool) -> Self {
        self.only_open = only_open;
        self
    }

    /// Set the name prefix search
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Reject criteria whose year range is inverted
    pub fn validate(&self) -> Result<()> {
        if self.year_range.start > self.year_range.end {
            return Err(HeritageError::InvalidCriteria {
                reason: format!(
                    "year range start {} is after end {}",
                    self.year_range.start, self.year_range.end
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_year_range_inclusive_bounds() {
        let range = YearRange::new(1950, 1960);
        assert!(range.contains(1950));
        assert!(range.contains(1960));
        assert!(!range.contains(1949));
        assert!(!range.contains(1961));
    }

    #[test]
    fn test_unfiltered_admits_uncategorized() {
        assert!(CategorySelection::Unfiltered.admits(&[]));
        assert!(!CategorySelection::all().admits(&[]));
    }

    #[test]
    fn test_empty_selection_admits_nothing() {
        let selection = CategorySelection::Only(BTreeSet::new());
        assert!(!selection.admits(&[CraftCategory::Cuisine]));
        assert!(!selection.admits(&[]));
    }

    #[test]
    fn test_selection_checks_every_category() {
        let selection = CategorySelection::only([CraftCategory::Textiles]);
        assert!(selection.admits(&[
            CraftCategory::Cuisine,
            CraftCategory::Fashion,
            CraftCategory::Textiles
        ]));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let criteria = FilterCriteria::new().with_year_range(2000, 1990);
        assert!(matches!(criteria.validate(), Err(HeritageError::InvalidCriteria { .. })));
        assert!(FilterCriteria::new().with_year_range(1990, 1990).validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_criteria() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"only_open": true, "search_text": "ab"}"#).unwrap();
        assert!(criteria.only_open);
        assert_eq!(criteria.categories, CategorySelection::Unfiltered);
        assert_eq!(criteria.year_range, YearRange::default());
    }

    proptest! {
        #[test]
        fn prop_all_selection_matches_any_categorized_entity(
            categories in prop::collection::vec(prop::sample::select(CraftCategory::ALL.to_vec()), 1..4),
        ) {
            prop_assert!(CategorySelection::all().admits(&categories));
            prop_assert!(CategorySelection::Unfiltered.admits(&categories));
        }

        #[test]
        fn prop_year_range_contains_is_inclusive(start in 1800i32..2100, len in 0i32..200) {
            let range = YearRange::new(start, start + len);
            prop_assert!(range.contains(start));
            prop_assert!(range.contains(start + len));
            prop_assert!(!range.contains(start - 1));
            prop_assert!(!range.contains(start + len + 1));
        }
    }
}
