use heritage_core::models::{EntityId, EntityKind, GeoEntity};
use heritage_core::ports::EntitySource;
use heritage_core::{HeritageError, Result};
use heritage_geo::distance_or_infinity;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{RankingDetail, SimilarityQuery, SimilarityResult};

/// Number of similar entities shown on a detail page
pub const DEFAULT_SIMILAR_COUNT: usize = 6;

/// Ordering key of one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    /// Distinct disciplines shared with the reference
    pub intersection: usize,
    /// Metres to the reference, `+inf` when either location is unusable
    pub distance: f64,
}

impl SimilarityScore {
    pub fn between(reference: &GeoEntity, candidate: &GeoEntity) -> Self {
        Self {
            intersection: shared_disciplines(reference, candidate),
            distance: distance_or_infinity(reference.location, candidate.location),
        }
    }

    /// More shared disciplines first, then closer first
    pub fn ranking_order(&self, other: &Self) -> Ordering {
        other
            .intersection
            .cmp(&self.intersection)
            .then_with(|| self.distance.total_cmp(&other.distance))
    }
}

fn shared_disciplines(reference: &GeoEntity, candidate: &GeoEntity) -> usize {
    let reference: BTreeSet<&str> = reference.craft_disciplines.iter().map(String::as_str).collect();
    candidate
        .craft_disciplines
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .intersection(&reference)
        .count()
}

/// Archives without a thumbnail cannot be shown in a similar list
fn is_candidate(reference: &GeoEntity, candidate: &GeoEntity) -> bool {
    if candidate.id == reference.id {
        return false;
    }
    match candidate.kind {
        EntityKind::Archive => candidate.thumbnail_id.as_deref().is_some_and(|t| !t.is_empty()),
        EntityKind::Workshop => true,
    }
}

/// Every eligible candidate with its score, best first.
///
/// The sort is stable, so ties keep their pool order.
pub fn rank<'a>(reference: &GeoEntity, pool: &'a [GeoEntity]) -> Vec<(&'a GeoEntity, SimilarityScore)> {
    let mut scored: Vec<_> = pool
        .iter()
        .filter(|candidate| is_candidate(reference, candidate))
        .map(|candidate| (candidate, SimilarityScore::between(reference, candidate)))
        .collect();

    scored.sort_by(|a, b| a.1.ranking_order(&b.1));
    scored
}

/// The `k` entities most similar to `reference`
pub fn compute_similar<'a>(reference: &GeoEntity, pool: &'a [GeoEntity], k: usize) -> Vec<&'a GeoEntity> {
    rank(reference, pool).into_iter().take(k).map(|(entity, _)| entity).collect()
}

impl SimilarityQuery {
    /// Rank `pool` against `reference`
    pub fn execute(&self, reference: &GeoEntity, pool: &[GeoEntity]) -> SimilarityResult {
        let ranked = rank(reference, pool);
        let candidates_evaluated = ranked.len();
        let top: Vec<_> = ranked.into_iter().take(self.top_k).collect();

        let ranking_details: Option<Vec<RankingDetail>> = self.explain.then(|| {
            top.iter()
                .enumerate()
                .map(|(i, (entity, score))| RankingDetail {
                    id: entity.id.clone(),
                    rank: i + 1,
                    shared_disciplines: score.intersection,
                    distance_m: score.distance.is_finite().then_some(score.distance),
                    score_explanation: if score.distance.is_finite() {
                        format!(
                            "{} shared discipline(s), {:.0} m away",
                            score.intersection, score.distance
                        )
                    } else {
                        format!("{} shared discipline(s), distance unknown", score.intersection)
                    },
                })
                .collect()
        });

        tracing::debug!(
            reference = %reference.id,
            candidates = candidates_evaluated,
            returned = top.len(),
            "Similarity ranking computed"
        );

        SimilarityResult {
            entities: top.into_iter().map(|(entity, _)| entity.clone()).collect(),
            candidates_evaluated,
            ranking_details,
        }
    }
}

/// Look up `id` in a source and rank the rest of its collection
pub async fn find_similar(
    source: &dyn EntitySource,
    id: &EntityId,
    query: &SimilarityQuery,
) -> Result<SimilarityResult> {
    let reference = source
        .get(id)
        .await?
        .ok_or_else(|| HeritageError::EntityNotFound { id: id.to_string() })?;

    let pool = match reference.kind {
        EntityKind::Workshop => source.workshops().await?,
        EntityKind::Archive => source.archives().await?,
    };

    Ok(query.execute(&reference, &pool))
}
