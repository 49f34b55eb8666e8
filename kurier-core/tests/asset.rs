//! Decoding of the bundled stop asset.

use std::io::Write;

use kurier_core::{AssetError, parse_stops, read_stops};

#[test]
fn parses_name_lat_lng_records_in_order() {
    let parsed = parse_stops(
        r#"[
            {"name": "Warsaw Center", "lat": 52.23, "lng": 21.01},
            {"name": "Praga", "lat": 52.25, "lng": 21.04}
        ]"#,
    )
    .expect("valid asset");

    assert!(parsed.skipped.is_empty());
    let names = parsed
        .stops
        .iter()
        .map(|stop| stop.name.0.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Warsaw Center", "Praga"]);
    assert!((parsed.stops[1].position.lng - 21.04).abs() < f64::EPSILON);
}

#[test]
fn accepts_polish_name_key() {
    let parsed = parse_stops(r#"[{"nazwa": "Wola", "lat": 52.24, "lng": 20.98}]"#)
        .expect("valid asset");
    assert_eq!(parsed.stops[0].name.0, "Wola");
}

#[test]
fn malformed_records_are_skipped_and_reported() {
    let parsed = parse_stops(
        r#"[
            {"name": "Ok", "lat": 52.0, "lng": 21.0},
            {"name": "NoLng", "lat": 52.0},
            {"name": "BadLat", "lat": "north", "lng": 21.0},
            "not an object",
            {"name": "AlsoOk", "lat": -33.9, "lng": 151.2}
        ]"#,
    )
    .expect("array decodes");

    let names = parsed
        .stops
        .iter()
        .map(|stop| stop.name.0.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Ok", "AlsoOk"]);
    let skipped = parsed
        .skipped
        .iter()
        .map(|record| record.index)
        .collect::<Vec<_>>();
    assert_eq!(skipped, [1, 2, 3]);
    assert!(parsed.skipped[0].reason.contains("lng"));
}

#[test]
fn document_that_is_not_an_array_fails() {
    let err = parse_stops(r#"{"name": "A", "lat": 1.0, "lng": 2.0}"#).expect_err("object");
    assert!(matches!(err, AssetError::Json(_)));

    let err = parse_stops("[{").expect_err("truncated");
    assert!(matches!(err, AssetError::Json(_)));
}

#[test]
fn read_stops_reports_missing_file_with_path() {
    let path = std::env::temp_dir().join("kurier-missing-asset-does-not-exist.json");
    let err = read_stops(&path).expect_err("file is missing");
    match err {
        AssetError::Io { path: reported, .. } => assert_eq!(reported, path),
        AssetError::Json(other) => panic!("unexpected decode error: {other}"),
    }
}

#[test]
fn read_stops_decodes_file() {
    let path = std::env::temp_dir().join(format!("kurier-asset-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("temp file");
    file.write_all(br#"[{"name": "Praga", "lat": 52.25, "lng": 21.04}]"#)
        .expect("write asset");
    drop(file);

    let parsed = read_stops(&path).expect("readable asset");
    std::fs::remove_file(&path).expect("cleanup");

    assert_eq!(parsed.stops.len(), 1);
    assert_eq!(parsed.stops[0].name.0, "Praga");
}
