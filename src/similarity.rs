//! The similarity module
//! Cosine ranking over a snapshot of namespace entries

use crate::error::SearchError;
use crate::store::Entry;
use crate::vector::{dot_product, l2_norm};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// A scored hit returned by [`search`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchMatch {
    pub key: String,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

/// Ranks `entries` by cosine similarity against `query`, keeping scores of
/// at least `min_score` and at most `k` results.
///
/// The query is unit-normalized first; a zero-norm query is passed through
/// as-is, which drives every dot product to 0.0 so any positive `min_score`
/// excludes everything. Zero-norm entries are skipped silently, they have
/// no direction to compare. A stored vector whose length differs from the
/// query fails the whole call with [`SearchError::DimensionMismatch`]
/// rather than skipping the entry.
///
/// Equal scores keep the entries' enumeration order (the sort is stable),
/// so results are deterministic for a fixed snapshot.
pub fn search(
    query: &[f32],
    entries: &[Entry],
    k: usize,
    min_score: f32,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    // Unit query makes the dot product below an exact cosine similarity
    let query = l2_norm(query).unwrap_or_else(|| query.to_vec());

    let mut matches = Vec::new();
    for entry in entries {
        let Some(stored) = l2_norm(&entry.embedding) else {
            debug!(key = %entry.key, "skipped zero vector");
            continue;
        };

        let score = dot_product(&query, &stored)?;
        if score >= min_score {
            matches.push(SearchMatch {
                key: entry.key.clone(),
                score,
                metadata: entry.metadata.clone(),
            });
        }
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(k);

    Ok(matches)
}
