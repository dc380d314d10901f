use heritage_core::config::AtlasSettings;
use heritage_core::models::{EntityId, GeoEntity};
use serde::{Deserialize, Serialize};

use crate::ranker::DEFAULT_SIMILAR_COUNT;

/// Options for a similarity lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityQuery {
    /// Number of entities to return
    pub top_k: usize,

    /// Whether to include per-result ranking details
    pub explain: bool,
}

impl Default for SimilarityQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityQuery {
    pub fn new() -> Self {
        Self { top_k: DEFAULT_SIMILAR_COUNT, explain: false }
    }

    /// Use the configured result count
    pub fn from_settings(settings: &AtlasSettings) -> Self {
        Self::new().with_top_k(settings.similar_count)
    }

    /// Set the number of results
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Enable ranking details
    pub fn with_explain(mut self, enabled: bool) -> Self {
        self.explain = enabled;
        self
    }
}

/// Ranked similar entities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// Most similar first
    pub entities: Vec<GeoEntity>,

    /// Number of pool entries that were eligible candidates
    pub candidates_evaluated: usize,

    /// Present when the query asked for an explanation
    pub ranking_details: Option<Vec<RankingDetail>>,
}

/// Why one entity landed where it did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingDetail {
    pub id: EntityId,

    /// 1-based position in the result
    pub rank: usize,

    /// Distinct craft disciplines shared with the reference
    pub shared_disciplines: usize,

    /// Great-circle distance in metres; `None` when either location is unusable
    pub distance_m: Option<f64>,

    /// Explanation of the ordering key
    pub score_explanation: String,
}
