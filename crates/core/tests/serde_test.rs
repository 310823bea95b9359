//! JSON page dumps and layout configuration.
#![cfg(feature = "serde")]

use folio_core::geometry::Rect;
use folio_core::{LayoutParams, Orientation, PageInput, extract_page};

const DUMP: &str = r#"{
    "page": 2,
    "bbox": {"llx": 0, "lly": 0, "urx": 600, "ury": 800},
    "marks": [
        {"text": "O", "bbox": {"llx": 10, "lly": 700, "urx": 15, "ury": 710}, "font": "F", "font_size": 10},
        {"text": "K", "bbox": {"llx": 15, "lly": 700, "urx": 20, "ury": 710}, "font": "F", "font_size": 10,
         "fill_color": [0, 0, 0]},
        {"text": "R", "bbox": {"llx": 570, "lly": 100, "urx": 580, "ury": 105}, "font": "F", "font_size": 10,
         "orientation": 90}
    ]
}"#;

#[test]
fn test_page_dump_defaults() {
    let input: PageInput = serde_json::from_str(DUMP).unwrap();
    assert_eq!(input.page, 2);
    assert_eq!(input.marks.len(), 3);
    assert!(input.strokes.is_empty());
    assert_eq!(input.marks[0].orientation, Orientation::Deg0);
    assert_eq!(input.marks[1].fill_color, Some(vec![0.0, 0.0, 0.0]));
    assert_eq!(input.marks[2].orientation, Orientation::Deg90);
    assert_eq!(input.marks[2].bbox, Rect::new(570.0, 100.0, 580.0, 105.0));
}

#[test]
fn test_bad_orientation_fails_to_parse() {
    let bad = DUMP.replace("\"orientation\": 90", "\"orientation\": 30");
    assert!(serde_json::from_str::<PageInput>(&bad).is_err());
}

#[test]
fn test_partial_config_keeps_defaults() {
    let params: LayoutParams =
        serde_json::from_str(r#"{"do_hyphens": false, "table_min_fill": 0.5}"#).unwrap();
    assert!(!params.do_hyphens);
    assert_eq!(params.table_min_fill, 0.5);
    assert_eq!(params.max_word_advance, LayoutParams::default().max_word_advance);
    assert!(params.validate().is_ok());
}

#[test]
fn test_page_text_serializes() {
    let input: PageInput = serde_json::from_str(DUMP).unwrap();
    let text = extract_page(&input, &LayoutParams::default()).unwrap();
    assert_eq!(text.text, "OK\n\nR");

    let json = serde_json::to_value(&text).unwrap();
    assert_eq!(json["page"], 2);
    assert_eq!(json["text"], "OK\n\nR");
    let marks = json["marks"].as_array().unwrap();
    assert_eq!(marks.len(), 4);
    assert_eq!(marks[1]["fill_color"], serde_json::json!([0.0, 0.0, 0.0]));
    assert_eq!(marks[2]["meta"], true);
    assert_eq!(marks[3]["offset"], 4);
}
