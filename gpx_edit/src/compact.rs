//! Timeline compaction.
//!
//! One pass over each segment's points, in original order, applying three
//! rules in strict priority: drop points before the cutoff, synthesize
//! placeholder points when the cutoff lands inside a recording gap, then
//! remove or shift points per edit interval. Later points shift earlier by
//! the total duration of every removed interval preceding them, closing the
//! timeline up.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::intervals::EditInterval;
use crate::{Point, Segment, Track};

/// Counts of what a compaction pass did, accumulated across segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditReport {
    /// Points discarded for being strictly before the cutoff.
    pub dropped_before_cutoff: usize,
    /// Points removed for lying strictly inside an edit interval.
    pub removed_in_intervals: usize,
    /// Surviving points whose time moved backward by at least one interval.
    pub shifted: usize,
    /// Placeholder points synthesized to bridge the cutoff gap.
    pub synthesized: usize,
}

impl EditReport {
    pub fn absorb(&mut self, other: EditReport) {
        self.dropped_before_cutoff += other.dropped_before_cutoff;
        self.removed_in_intervals += other.removed_in_intervals;
        self.shifted += other.shifted;
        self.synthesized += other.synthesized;
    }
}

/// Per-track processing state. The gap-fill flag must not leak across
/// tracks: each track gets a fresh context.
struct TrackContext {
    gap_filled: bool,
}

impl TrackContext {
    fn new() -> Self {
        Self { gap_filled: false }
    }
}

/// Compact a track in place: drop points before `cutoff`, bridge a
/// cutoff-induced recording gap with synthetic 1 Hz points, and apply the
/// validated, sorted edit intervals to every remaining point.
///
/// `intervals` must come from [`crate::validate_and_sort`]; the pass is
/// total over validated input and has no failure cases of its own. Segments
/// are expected to be time-ordered, as recorded tracks are.
pub fn compact<P: Clone>(
    track: &mut Track<P>,
    cutoff: Option<DateTime<Utc>>,
    intervals: &[EditInterval],
) -> EditReport {
    let mut ctx = TrackContext::new();
    let mut report = EditReport::default();
    for segment in &mut track.segments {
        compact_segment(segment, cutoff, intervals, &mut ctx, &mut report);
    }
    report
}

fn compact_segment<P: Clone>(
    segment: &mut Segment<P>,
    cutoff: Option<DateTime<Utc>>,
    intervals: &[EditInterval],
    ctx: &mut TrackContext,
    report: &mut EditReport,
) {
    let points = std::mem::take(&mut segment.points);
    let mut kept: Vec<Point<P>> = Vec::with_capacity(points.len());

    for mut point in points {
        if let Some(cutoff) = cutoff {
            if point.time < cutoff {
                report.dropped_before_cutoff += 1;
                continue;
            }
            if !ctx.gap_filled {
                // First surviving point of the track. If it strictly exceeds
                // the cutoff, the cutoff instant fell inside a recording gap:
                // bridge it with 1 Hz placeholders carrying this point's
                // payload, from the cutoff up to (exclusive) the point's
                // original time. Either way the gap is now resolved for the
                // rest of the track.
                ctx.gap_filled = true;
                let mut fill = cutoff;
                while fill < point.time {
                    kept.push(Point {
                        time: fill,
                        payload: point.payload.clone(),
                    });
                    report.synthesized += 1;
                    fill += Duration::seconds(1);
                }
            }
        }

        match apply_intervals(&mut point, intervals) {
            PointFate::Removed => report.removed_in_intervals += 1,
            PointFate::Shifted => {
                report.shifted += 1;
                kept.push(point);
            }
            PointFate::Untouched => kept.push(point),
        }
    }

    segment.points = kept;
}

enum PointFate {
    Removed,
    Shifted,
    Untouched,
}

/// Test-then-shift against each interval in ascending order. The interior
/// test runs against the point's already-shifted time, so after several
/// removed intervals a point accumulates the sum of their durations as
/// backward shift. Reordering this loop changes which points count as
/// interior, so it stays sequential.
fn apply_intervals<P>(point: &mut Point<P>, intervals: &[EditInterval]) -> PointFate {
    let mut shifted = false;
    for interval in intervals {
        if interval.start < point.time && point.time < interval.end {
            return PointFate::Removed;
        }
        if point.time >= interval.end {
            point.time -= interval.duration();
            shifted = true;
        }
    }
    if shifted {
        PointFate::Shifted
    } else {
        PointFate::Untouched
    }
}
