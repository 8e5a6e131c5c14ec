//! On-topic admission gate.
//!
//! A query is admitted only when the top retrieval score strictly exceeds
//! the configured threshold. This is an accepted heuristic: false negatives
//! near the boundary are a known limitation, and the threshold is static
//! configuration, not adaptive to the query or corpus size.

use crate::types::SearchHit;

/// Decide whether retrieval results admit the query.
///
/// Strictly `top_score > threshold`; equality rejects. An empty result set
/// is always rejected without evaluating the comparison.
pub fn admit(hits: &[SearchHit], threshold: f32) -> bool {
    match hits.first() {
        Some(top) => top.score > threshold,
        None => false,
    }
}
