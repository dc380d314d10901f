//! Heritage Similarity - Ranking of related workshops and archives
//!
//! Candidates are ordered by how many craft disciplines they share with a
//! reference entity, then by great-circle distance to it.

pub mod models;
pub mod ranker;

pub use models::{RankingDetail, SimilarityQuery, SimilarityResult};
pub use ranker::{compute_similar, find_similar, rank, SimilarityScore, DEFAULT_SIMILAR_COUNT};
