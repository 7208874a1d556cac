//! Edit-interval validation and ordering.
//!
//! An edit interval is a time span whose interior points are deleted from the
//! track and whose later points shift earlier by the interval's duration. The
//! whole interval set is validated up front: either every interval is accepted
//! and compaction proceeds, or nothing is mutated.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::EditError;

/// A half-closed time span `[start, end]` to cut out of the timeline.
///
/// Post-validation invariants: `start <= end`, and no two accepted intervals
/// share an interior point. Intervals that merely touch at a boundary value
/// are fine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EditInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Length of the interval; the backward shift applied to points at or
    /// after `end`.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl std::fmt::Display for EditInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} .. {}]",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Pair up separately supplied start and end timestamps and validate the
/// resulting interval set.
///
/// Starts and ends are matched by position; mismatched counts are rejected
/// before validation runs.
pub fn build_intervals(
    starts: Vec<DateTime<Utc>>,
    ends: Vec<DateTime<Utc>>,
) -> Result<Vec<EditInterval>, EditError> {
    if starts.len() != ends.len() {
        return Err(EditError::UnpairedBoundary {
            starts: starts.len(),
            ends: ends.len(),
        });
    }
    validate_and_sort(starts.into_iter().zip(ends).collect())
}

/// Validate a set of `(start, end)` pairs and return them sorted ascending
/// by `(start, end)`.
///
/// Rejects any pair whose end precedes its start, then rejects the whole set
/// if any two intervals strictly overlap. All overlap comparisons are strict:
/// intervals touching at a shared boundary value are accepted. The sort is
/// stable, so pairs with identical starts keep their input order relative to
/// the `end` tie-break.
pub fn validate_and_sort(
    pairs: Vec<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<Vec<EditInterval>, EditError> {
    for &(start, end) in &pairs {
        if end < start {
            return Err(EditError::InvertedInterval(EditInterval::new(start, end)));
        }
    }

    let mut intervals: Vec<EditInterval> = pairs
        .into_iter()
        .map(|(start, end)| EditInterval::new(start, end))
        .collect();
    intervals.sort_by_key(|iv| (iv.start, iv.end));

    // Each unordered pair is tested once; the four predicates cover both
    // directions. A boundary inside the other interval's interior is an
    // overlap, a shared boundary value is not.
    for i in 0..intervals.len() {
        for j in (i + 1)..intervals.len() {
            let r = intervals[i];
            let c = intervals[j];
            let overlapping = (r.start < c.start && c.start < r.end)
                || (r.start < c.end && c.end < r.end)
                || (c.start < r.start && r.start < c.end)
                || (c.start < r.end && r.end < c.end);
            if overlapping {
                return Err(EditError::OverlappingIntervals(r, c));
            }
        }
    }

    Ok(intervals)
}
