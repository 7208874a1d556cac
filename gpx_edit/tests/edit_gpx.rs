//! End-to-end decode → edit → encode tests on an inline GPX document.

use chrono::{DateTime, Utc};
use gpx_edit::{edit_gpx, parse_timestamp, read_gpx, validate_and_sort, write_gpx};

fn gpx_doc(points: &[(&str, f64)]) -> String {
    let mut doc = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <gpx version=\"1.1\" creator=\"gpx_edit tests\" \
         xmlns=\"http://www.topografix.com/GPX/1/1\">\n<trk>\n<trkseg>\n",
    );
    for (time, ele) in points {
        doc.push_str(&format!(
            "<trkpt lat=\"47.0\" lon=\"9.0\"><ele>{ele}</ele><time>{time}</time></trkpt>\n"
        ));
    }
    doc.push_str("</trkseg>\n</trk>\n</gpx>\n");
    doc
}

fn point_summary(gpx: &gpx::Gpx) -> Vec<(DateTime<Utc>, Option<f64>)> {
    let mut out = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for waypoint in &segment.points {
                let iso = waypoint.time.unwrap().format().unwrap();
                let time = DateTime::parse_from_rfc3339(&iso)
                    .unwrap()
                    .with_timezone(&Utc);
                out.push((time, waypoint.elevation));
            }
        }
    }
    out
}

#[test]
fn removes_intervals_and_closes_up_timeline() {
    let doc = gpx_doc(&[
        ("2023-06-01T10:00:05Z", 410.0),
        ("2023-06-01T10:00:15Z", 420.0),
        ("2023-06-01T10:00:25Z", 430.0),
        ("2023-06-01T10:00:35Z", 440.0),
        ("2023-06-01T10:00:45Z", 450.0),
    ]);
    let mut gpx = read_gpx(doc.as_bytes()).unwrap();

    let intervals = validate_and_sort(vec![
        (
            parse_timestamp("2023-06-01 10:00:10").unwrap(),
            parse_timestamp("2023-06-01 10:00:20").unwrap(),
        ),
        (
            parse_timestamp("2023-06-01 10:00:30").unwrap(),
            parse_timestamp("2023-06-01 10:00:40").unwrap(),
        ),
    ])
    .unwrap();

    let report = edit_gpx(&mut gpx, None, &intervals).unwrap();
    assert_eq!(report.removed_in_intervals, 2);

    // Round-trip through the encoder before inspecting.
    let encoded = write_gpx(&gpx).unwrap();
    let reread = read_gpx(&encoded).unwrap();
    let points = point_summary(&reread);

    let expect = |s: &str| parse_timestamp(s).unwrap();
    assert_eq!(
        points,
        vec![
            (expect("2023-06-01 10:00:05"), Some(410.0)),
            (expect("2023-06-01 10:00:15"), Some(430.0)),
            (expect("2023-06-01 10:00:25"), Some(440.0)),
        ]
    );
}

#[test]
fn cutoff_inside_recording_gap_is_bridged() {
    let doc = gpx_doc(&[
        ("2023-06-01T09:59:50Z", 400.0),
        ("2023-06-01T10:00:03Z", 444.0),
    ]);
    let mut gpx = read_gpx(doc.as_bytes()).unwrap();

    let cutoff = parse_timestamp("2023-06-01 10:00:00").unwrap();
    let report = edit_gpx(&mut gpx, Some(cutoff), &[]).unwrap();
    assert_eq!(report.dropped_before_cutoff, 1);
    assert_eq!(report.synthesized, 3);

    let encoded = write_gpx(&gpx).unwrap();
    let reread = read_gpx(&encoded).unwrap();
    let points = point_summary(&reread);

    // Synthetic points carry the surviving point's payload.
    let expect = |s: &str| parse_timestamp(s).unwrap();
    assert_eq!(
        points,
        vec![
            (expect("2023-06-01 10:00:00"), Some(444.0)),
            (expect("2023-06-01 10:00:01"), Some(444.0)),
            (expect("2023-06-01 10:00:02"), Some(444.0)),
            (expect("2023-06-01 10:00:03"), Some(444.0)),
        ]
    );
}

#[test]
fn no_edits_requested_leaves_document_unchanged() {
    let doc = gpx_doc(&[
        ("2023-06-01T10:00:05Z", 410.0),
        ("2023-06-01T10:00:15Z", 420.0),
    ]);
    let mut gpx = read_gpx(doc.as_bytes()).unwrap();
    let before = point_summary(&gpx);

    let report = edit_gpx(&mut gpx, None, &[]).unwrap();
    assert_eq!(report, gpx_edit::EditReport::default());
    assert_eq!(point_summary(&gpx), before);
}
