#![allow(clippy::float_cmp)]

use super::*;

fn sample() -> Stroke {
    let mut s = Stroke::begin("#112233", 3.0, NormPoint::new(0.1, 0.2));
    s.push(NormPoint::new(0.3, 0.4));
    s
}

// =============================================================
// Stroke
// =============================================================

#[test]
fn begin_holds_single_start_point() {
    let s = Stroke::begin("#000000", 2.0, NormPoint::new(0.5, 0.5));
    assert_eq!(s.len(), 1);
    assert!(!s.is_empty());
    assert_eq!(s.points[0], NormPoint::new(0.5, 0.5));
}

#[test]
fn push_preserves_order() {
    let mut s = Stroke::begin("#000000", 2.0, NormPoint::new(0.0, 0.0));
    for i in 1..=5 {
        s.push(NormPoint::new(f64::from(i) / 10.0, 0.0));
    }
    let xs: Vec<f64> = s.points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]);
}

#[test]
fn to_json_uses_host_field_names() {
    let json = sample().to_json().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["color"], "#112233");
    assert_eq!(v["width"], 3.0);
    assert_eq!(v["points"][1]["x"], 0.3);
    assert_eq!(v["points"][1]["y"], 0.4);
}

// =============================================================
// StrokeSet::from_json
// =============================================================

#[test]
fn from_json_null_is_empty() {
    let set = StrokeSet::from_json("null").unwrap();
    assert!(set.is_empty());
}

#[test]
fn from_json_empty_array_is_empty() {
    let set = StrokeSet::from_json("[]").unwrap();
    assert_eq!(set.len(), 0);
}

#[test]
fn from_json_keeps_order() {
    let json = r##"[
        {"color":"#111111","width":1,"points":[{"x":0.1,"y":0.1}]},
        {"color":"#222222","width":2,"points":[{"x":0.2,"y":0.2}]}
    ]"##;
    let set = StrokeSet::from_json(json).unwrap();
    let colors: Vec<&str> = set.iter().map(|s| s.color.as_str()).collect();
    assert_eq!(colors, vec!["#111111", "#222222"]);
}

#[test]
fn from_json_missing_points_is_empty_stroke() {
    let set = StrokeSet::from_json(r##"[{"color":"#111111","width":1}]"##).unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.iter().next().unwrap().is_empty());
}

#[test]
fn from_json_drops_malformed_entries() {
    let json = r##"[
        {"color":"#111111","width":1,"points":[]},
        {"color":42},
        "not a stroke",
        {"color":"#333333","width":3,"points":[{"x":0.5,"y":0.5}]}
    ]"##;
    let set = StrokeSet::from_json(json).unwrap();
    assert_eq!(set.len(), 2);
}

#[test]
fn from_json_clamps_out_of_range_points() {
    let json = r##"[{"color":"#111111","width":1,"points":[{"x":-0.5,"y":1.5}]}]"##;
    let set = StrokeSet::from_json(json).unwrap();
    let p = set.iter().next().unwrap().points[0];
    assert_eq!(p, NormPoint::new(0.0, 1.0));
}

#[test]
fn from_json_rejects_object_document() {
    assert!(matches!(StrokeSet::from_json("{}"), Err(StrokeError::NotAnArray)));
}

#[test]
fn from_json_rejects_invalid_json() {
    assert!(matches!(StrokeSet::from_json("[{"), Err(StrokeError::Decode(_))));
}

#[test]
fn from_vec_and_iterate_by_reference() {
    let set: StrokeSet = vec![sample(), sample()].into();
    let mut count = 0;
    for stroke in &set {
        assert_eq!(stroke.len(), 2);
        count += 1;
    }
    assert_eq!(count, 2);
}
