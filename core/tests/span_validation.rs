use highlight_core::annotation::text_index::TextIndex;
use highlight_core::annotation::validator::{validate_json, validate_with_report};
use highlight_core::annotation::RawAnnotation;
use highlight_core::diagnostics::event::DropReason;
use highlight_core::error::CoreError;
use serde_json::json;

fn raw(v: serde_json::Value) -> RawAnnotation {
    serde_json::from_value(v).unwrap()
}

#[test]
fn case_mismatched_quote_is_dropped() {
    let text = "The sky is blue and Politicians always lie.";
    let a = raw(json!({
        "id": "f1", "category": "bias", "severity": "high", "confidence": 0.9,
        "start": 20, "end": 42, "quote": "politicians always lie"
    }));
    let (kept, report) = validate_with_report(text, &[a]);
    assert!(kept.is_empty());
    assert_eq!(report.dropped[0].reason, DropReason::OFFSET_MISMATCH);
}

#[test]
fn end_past_text_is_clamped() {
    let text = "x".repeat(40) + "0123456789";
    let a = raw(json!({
        "id": "f1", "category": "tactic", "severity": "low", "confidence": 0.5,
        "start": 40, "end": 10000, "quote": "0123456789"
    }));
    let (kept, _) = validate_with_report(&text, &[a]);
    assert_eq!(kept.len(), 1);
    assert_eq!((kept[0].start(), kept[0].end()), (40, 50));
}

#[test]
fn every_kept_span_matches_its_quote() {
    let text = "Naïve readers trust headlines. Experts agree, so it must be true. Act now!";
    let anns = vec![
        raw(json!({"id": "a", "category": "bias", "severity": "medium", "confidence": 0.7,
                   "start": 0, "end": 5, "quote": "Naïve readers"})),
        raw(json!({"id": "b", "category": "fallacy", "severity": "high", "confidence": 0.9,
                   "start": 31, "end": 64, "quote": "Experts agree, so it must be true"})),
        raw(json!({"id": "c", "category": "tactic", "severity": "low", "confidence": 0.4,
                   "start": 90, "end": 80, "quote": "Act now!"})),
        raw(json!({"id": "d", "category": "factcheck", "severity": "low", "confidence": 0.4,
                   "start": 0, "end": 3, "quote": "nowhere in text"})),
    ];
    let (kept, report) = validate_with_report(text, &anns);
    let index = TextIndex::new(text);
    for a in &kept {
        assert_eq!(index.slice(a.start(), a.end()), a.quote());
    }
    assert_eq!(kept.len(), 3);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].annotation_id.as_deref(), Some("d"));
}

#[test]
fn malformed_elements_drop_but_non_array_fails() {
    let text = json!("Always trust me.");
    let anns = json!([
        {"id": "ok", "category": "tactic", "severity": "low", "confidence": 0.3,
         "start": 0, "end": 12, "quote": "Always trust"},
        {"id": "bad", "severity": "catastrophic"},
        42
    ]);
    let (kept, report) = validate_json(&text, &anns).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(report.received, 3);
    assert!(report
        .dropped
        .iter()
        .all(|d| d.reason == DropReason::MALFORMED_ANNOTATION));

    let err = validate_json(&text, &json!({"findings": []})).unwrap_err();
    assert!(matches!(err, CoreError::ContractViolation(_)));
    let err = validate_json(&json!(7), &json!([])).unwrap_err();
    assert!(matches!(err, CoreError::ContractViolation(_)));
}

#[test]
fn out_of_range_confidence_is_never_coerced() {
    let a = raw(json!({"id": "f", "category": "bias", "severity": "low", "confidence": 1.5,
                       "start": 0, "end": 3, "quote": "abc"}));
    let (kept, report) = validate_with_report("abcdef", &[a]);
    assert!(kept.is_empty());
    assert_eq!(report.dropped[0].reason, DropReason::INVALID_CONFIDENCE);
}

#[test]
fn offsets_count_utf16_units_around_emoji() {
    let text = "😀 hi there";
    let exact = raw(json!({"id": "f1", "category": "bias", "severity": "low", "confidence": 0.5,
                           "start": 3, "end": 5, "quote": "hi"}));
    let shifted = raw(json!({"id": "f2", "category": "bias", "severity": "low", "confidence": 0.5,
                             "start": 1, "end": 3, "quote": "there"}));
    let (kept, _) = validate_with_report(text, &[exact, shifted]);
    assert_eq!((kept[0].start(), kept[0].end()), (3, 5));
    assert_eq!((kept[1].start(), kept[1].end()), (6, 11));
}

#[test]
fn span_starting_inside_surrogate_pair_snaps_to_the_emoji() {
    let text = "a😀b";
    let a = raw(json!({"id": "f1", "category": "tactic", "severity": "low", "confidence": 0.5,
                       "start": 2, "end": 4, "quote": "😀b"}));
    let (kept, _) = validate_with_report(text, &[a]);
    assert_eq!((kept[0].start(), kept[0].end()), (1, 4));
}
