//! Text-pair distribution across annotators.
//!
//! Unassigned pairs are shuffled with an unbiased Fisher–Yates permutation and
//! then cut into contiguous chunks, one per annotator. Chunk sizes differ by
//! at most one: every annotator receives `floor(P / N)` pairs and the first
//! `P mod N` annotators (in request order) receive one extra.

use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Deadline applied when an assignment request does not carry one.
pub const DEFAULT_DEADLINE_DAYS: i64 = 7;

/// Number of pairs each of `annotators` receives when `total` pairs are split.
///
/// The returned vector has exactly `annotators` entries and sums to `total`.
pub fn chunk_sizes(total: usize, annotators: usize) -> Result<Vec<usize>, CoreError> {
    if annotators == 0 {
        return Err(CoreError::Validation("No valid annotators found".into()));
    }
    let base = total / annotators;
    let remainder = total % annotators;
    Ok((0..annotators)
        .map(|i| base + usize::from(i < remainder))
        .collect())
}

/// Split `items` into `annotators` contiguous chunks without reordering.
pub fn partition<T>(items: Vec<T>, annotators: usize) -> Result<Vec<Vec<T>>, CoreError> {
    let sizes = chunk_sizes(items.len(), annotators)?;
    let mut rest = items.into_iter();
    Ok(sizes
        .into_iter()
        .map(|size| rest.by_ref().take(size).collect())
        .collect())
}

/// Shuffle `items` uniformly and split them across `annotators`.
///
/// Fails when there is nothing to distribute or nobody to distribute to.
pub fn shuffle_and_partition<T, R>(
    mut items: Vec<T>,
    annotators: usize,
    rng: &mut R,
) -> Result<Vec<Vec<T>>, CoreError>
where
    R: Rng + ?Sized,
{
    if annotators == 0 {
        return Err(CoreError::Validation("No valid annotators found".into()));
    }
    if items.is_empty() {
        return Err(CoreError::Validation(
            "No unassigned text pairs available".into(),
        ));
    }
    items.shuffle(rng);
    partition(items, annotators)
}

/// Deadline for newly created tasks: the requested one, or now + 7 days.
pub fn resolve_deadline(requested: Option<Timestamp>, now: Timestamp) -> Timestamp {
    requested.unwrap_or_else(|| now + Duration::days(DEFAULT_DEADLINE_DAYS))
}

/// Keep the first occurrence of every id, preserving request order.
pub fn dedup_preserving_order<T: PartialEq + Copy>(ids: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
