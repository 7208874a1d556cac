//! GPX track timeline editing library.
//!
//! Edits a recorded GPX track in two ways: discards every point before a
//! cutoff timestamp (bridging a cutoff that lands inside a recording gap
//! with synthetic 1 Hz points), and removes named time intervals from the
//! track while shifting later points earlier so the timeline closes up by
//! exactly the removed duration.
//!
//! The interval set is validated as a whole before any track is touched;
//! the edit is all-or-nothing with respect to input well-formedness.

use chrono::{DateTime, Utc};
use gpx::Gpx;
use thiserror::Error;

mod compact;
mod intervals;

pub use compact::{compact, EditReport};
pub use intervals::{build_intervals, validate_and_sort, EditInterval};

#[derive(Error, Debug)]
pub enum EditError {
    #[error("failed to parse GPX file: {0}")]
    GpxParse(String),
    #[error("failed to write GPX file: {0}")]
    GpxWrite(String),
    #[error("invalid timestamp (expected YYYY-MM-DD HH:MM:SS): {0}")]
    BadTimestamp(String),
    #[error("track point has no timestamp")]
    MissingTime,
    #[error("each adjustment start must be paired with an adjustment end (got {starts} starts, {ends} ends)")]
    UnpairedBoundary { starts: usize, ends: usize },
    #[error("adjustment end precedes its start: {0}")]
    InvertedInterval(EditInterval),
    #[error("adjustment intervals overlap: {0} and {1}")]
    OverlappingIntervals(EditInterval, EditInterval),
}

/// A timestamped point. The payload is whatever the codec decoded alongside
/// the time (for GPX, the full waypoint) and is carried through the edit
/// untouched; gap fill copies it onto synthetic points.
#[derive(Clone, Debug, PartialEq)]
pub struct Point<P> {
    pub time: DateTime<Utc>,
    pub payload: P,
}

/// An ordered run of points. Recorded segments are time-ordered; compaction
/// preserves that ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment<P> {
    pub points: Vec<Point<P>>,
}

/// An ordered sequence of segments. Gap-fill state is scoped to one track.
#[derive(Clone, Debug, PartialEq)]
pub struct Track<P> {
    pub segments: Vec<Segment<P>>,
}

/// Parse a human-entered `YYYY-MM-DD HH:MM:SS` timestamp as UTC.
///
/// A fixed `+0000` offset is appended before parsing; no other timezone
/// handling is supported.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, EditError> {
    let with_offset = format!("{s} +0000");
    DateTime::parse_from_str(&with_offset, "%Y-%m-%d %H:%M:%S %z")
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| EditError::BadTimestamp(format!("{s}: {e}")))
}

/// Decode a GPX document from bytes.
pub fn read_gpx(input: &[u8]) -> Result<Gpx, EditError> {
    let mut cursor = std::io::Cursor::new(input);
    gpx::read(&mut cursor).map_err(|e| EditError::GpxParse(e.to_string()))
}

/// Encode a GPX document back to XML bytes.
pub fn write_gpx(gpx: &Gpx) -> Result<Vec<u8>, EditError> {
    let mut out = Vec::new();
    gpx::write(gpx, &mut out).map_err(|e| EditError::GpxWrite(e.to_string()))?;
    Ok(out)
}

/// Apply the cutoff and the validated edit intervals to every track of a
/// GPX document, in place.
///
/// Every point must carry a timestamp; a point without one fails the whole
/// edit before any track is mutated. Each track is compacted with fresh
/// gap-fill state. Returns the accumulated edit counts.
pub fn edit_gpx(
    gpx: &mut Gpx,
    cutoff: Option<DateTime<Utc>>,
    intervals: &[EditInterval],
) -> Result<EditReport, EditError> {
    // Lift everything first so a missing timestamp anywhere rejects the
    // file before any segment is rewritten.
    let mut lifted = Vec::with_capacity(gpx.tracks.len());
    for track in &gpx.tracks {
        let mut segments = Vec::with_capacity(track.segments.len());
        for segment in &track.segments {
            let mut points = Vec::with_capacity(segment.points.len());
            for waypoint in &segment.points {
                points.push(Point {
                    time: waypoint_time(waypoint)?,
                    payload: waypoint.clone(),
                });
            }
            segments.push(Segment { points });
        }
        lifted.push(Track { segments });
    }

    let mut report = EditReport::default();
    for (track, mut edited) in gpx.tracks.iter_mut().zip(lifted) {
        report.absorb(compact(&mut edited, cutoff, intervals));
        for (segment, edited_segment) in track.segments.iter_mut().zip(edited.segments) {
            let mut points = Vec::with_capacity(edited_segment.points.len());
            for point in edited_segment.points {
                let mut waypoint = point.payload;
                waypoint.time = Some(to_gpx_time(point.time)?);
                points.push(waypoint);
            }
            segment.points = points;
        }
    }
    Ok(report)
}

fn waypoint_time(waypoint: &gpx::Waypoint) -> Result<DateTime<Utc>, EditError> {
    let time = waypoint.time.ok_or(EditError::MissingTime)?;
    let iso = time.format().map_err(|e| EditError::GpxParse(e.to_string()))?;
    Ok(DateTime::parse_from_rfc3339(&iso)
        .map_err(|e| EditError::GpxParse(e.to_string()))?
        .with_timezone(&Utc))
}

fn to_gpx_time(time: DateTime<Utc>) -> Result<gpx::Time, EditError> {
    let odt = time::OffsetDateTime::from_unix_timestamp(time.timestamp())
        .map_err(|e| EditError::GpxWrite(e.to_string()))?;
    Ok(gpx::Time::from(odt))
}
