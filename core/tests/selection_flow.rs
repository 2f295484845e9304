use highlight_core::annotation::{validate, RawAnnotation};
use highlight_core::resolve::CategoryFilter;
use highlight_core::selection::{ClearReason, SelectionCorrelator, SelectionEffect, SelectionTarget};
use highlight_core::Category;
use serde_json::json;

const TEXT: &str = "Studies prove it, and only cowards disagree.";

fn batch() -> Vec<highlight_core::Annotation> {
    let raws: Vec<RawAnnotation> = serde_json::from_value(json!([
        {"id": "f1", "category": "factcheck", "severity": "medium", "confidence": 0.6,
         "start": 0, "end": 16, "quote": "Studies prove it"},
        {"id": "f2", "category": "fallacy", "severity": "high", "confidence": 0.9,
         "start": 22, "end": 43, "quote": "only cowards disagree"}
    ]))
    .unwrap();
    validate(TEXT, &raws)
}

#[test]
fn selecting_then_disabling_category_clears_selection() {
    let mut c = SelectionCorrelator::default();
    c.set_annotations(&batch());
    assert_eq!(c.select("f2", 0).len(), 2);

    let effects = c.set_enabled_categories(CategoryFilter::all_enabled().with_disabled(Category::Fallacy));
    assert_eq!(
        effects,
        vec![SelectionEffect::Cleared {
            id: "f2".to_string(),
            reason: ClearReason::CategoryDisabled
        }]
    );
    assert_eq!(c.selected(), None);
    assert!(!c.is_visible("f2"));
    assert!(c.is_visible("f1"));
}

#[test]
fn highlight_click_moves_list_and_switches_selection() {
    let mut c = SelectionCorrelator::new(1500);
    c.set_annotations(&batch());
    c.select("f1", 100);
    let effects = c.on_highlight_click("f2", 200);
    assert_eq!(
        effects[1],
        SelectionEffect::Emphasize {
            target: SelectionTarget::List,
            id: "f2".to_string(),
            until_ms: 1700
        }
    );
    assert_eq!(c.selected(), Some("f2"));

    let reverted = c.tick(1700);
    assert_eq!(reverted.len(), 2);
}

#[test]
fn disabling_an_unselected_category_keeps_selection() {
    let mut c = SelectionCorrelator::default();
    c.set_annotations(&batch());
    c.select("f1", 0);
    assert!(c
        .set_enabled_categories(CategoryFilter::all_enabled().with_disabled(Category::Tactic))
        .is_empty());
    assert_eq!(c.selected(), Some("f1"));
}
