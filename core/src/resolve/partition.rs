use crate::annotation::model::Annotation;
use crate::annotation::text_index::TextIndex;
use crate::resolve::scoring::ScoringWeights;
use serde::Serialize;

/// A maximal run of text whose covering annotation set does not change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "coveringAnnotations")]
    pub covering: Vec<Annotation>,
    pub primary: Option<Annotation>,
}

impl Segment {
    pub fn is_plain(&self) -> bool {
        self.covering.is_empty()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Sorted covering ids joined with `|`; empty for plain text.
    pub fn signature(&self) -> String {
        signature_of(&self.covering)
    }

    pub fn covers(&self, annotation_id: &str) -> bool {
        self.covering.iter().any(|a| a.id() == annotation_id)
    }

    pub fn text<'a>(&self, index: &TextIndex<'a>) -> &'a str {
        index.slice(self.start, self.end)
    }
}

fn signature_of(covering: &[Annotation]) -> String {
    let mut ids: Vec<&str> = covering.iter().map(|a| a.id()).collect();
    ids.sort_unstable();
    ids.join("|")
}

/// Partition `[0, text_len)` into ordered, non-overlapping segments.
///
/// Boundaries are every annotation start/end plus both text ends. Each
/// elementary interval is covered by the annotations that span it entirely;
/// adjacent intervals with the same covering set are merged back together.
/// Annotations must already lie inside `[0, text_len]`.
pub fn partition(
    text_len: usize,
    annotations: &[Annotation],
    weights: &ScoringWeights,
) -> Vec<Segment> {
    if text_len == 0 {
        return Vec::new();
    }

    let mut points: Vec<usize> = Vec::with_capacity(annotations.len() * 2 + 2);
    points.push(0);
    points.push(text_len);
    for a in annotations {
        points.push(a.start());
        points.push(a.end());
    }
    points.sort_unstable();
    points.dedup();

    let mut raw: Vec<(Segment, String)> = Vec::with_capacity(points.len());
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if b <= a {
            continue;
        }
        let mut covering: Vec<Annotation> = annotations
            .iter()
            .filter(|f| f.start() <= a && f.end() >= b)
            .cloned()
            .collect();
        covering.sort_by(|x, y| x.id().cmp(y.id()));
        let primary = weights.pick_primary(&covering).cloned();
        let key = signature_of(&covering);
        raw.push((
            Segment {
                start: a,
                end: b,
                covering,
                primary,
            },
            key,
        ));
    }

    let mut merged: Vec<Segment> = Vec::with_capacity(raw.len());
    let mut prev_key: Option<String> = None;
    for (seg, key) in raw {
        if let Some(cur) = merged.last_mut() {
            if prev_key.as_deref() == Some(key.as_str()) && seg.start == cur.end {
                cur.end = seg.end;
                continue;
            }
        }
        merged.push(seg);
        prev_key = Some(key);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::model::{Category, RawAnnotation, Severity};
    use crate::annotation::validator::validate;

    fn raw(id: &str, cat: Category, sev: Severity, conf: f64, start: i64, end: i64, text: &str) -> RawAnnotation {
        let quote: String = text
            .chars()
            .skip(start as usize)
            .take((end - start) as usize)
            .collect();
        RawAnnotation {
            id: id.to_string(),
            category: cat,
            category_id: String::new(),
            label: id.to_uppercase(),
            severity: sev,
            confidence: conf,
            start,
            end,
            quote,
            explanation: String::new(),
            suggestion: None,
        }
    }

    #[test]
    fn severity_beats_confidence_for_primary() {
        let text = "0123456789abcdefghijKLMNOP";
        let anns = validate(
            text,
            &[
                raw("a", Category::Bias, Severity::High, 0.9, 10, 20, text),
                raw("b", Category::Fallacy, Severity::Low, 0.95, 10, 20, text),
            ],
        );
        let segs = partition(26, &anns, &ScoringWeights::default());
        let covered: Vec<&Segment> = segs.iter().filter(|s| !s.is_plain()).collect();
        assert_eq!(covered.len(), 1);
        assert_eq!(covered[0].primary.as_ref().unwrap().id(), "a");
        assert_eq!((covered[0].start, covered[0].end), (10, 20));
    }

    #[test]
    fn nested_span_splits_into_three() {
        let text = "aaaaaaaaaabbbbbbbbbbcccccccccc";
        let anns = validate(
            text,
            &[
                raw("outer", Category::Bias, Severity::Low, 0.5, 0, 30, text),
                raw("inner", Category::Tactic, Severity::High, 0.5, 10, 20, text),
            ],
        );
        let segs = partition(30, &anns, &ScoringWeights::default());
        let bounds: Vec<(usize, usize)> = segs.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bounds, vec![(0, 10), (10, 20), (20, 30)]);
        assert_eq!(segs[1].signature(), "inner|outer");
        assert_eq!(segs[1].primary.as_ref().unwrap().id(), "inner");
        assert_eq!(segs[0].primary.as_ref().unwrap().id(), "outer");
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(partition(0, &[], &ScoringWeights::default()).is_empty());
    }

    #[test]
    fn no_annotations_is_one_plain_segment() {
        let segs = partition(12, &[], &ScoringWeights::default());
        assert_eq!(segs.len(), 1);
        assert!(segs[0].is_plain());
        assert!(segs[0].primary.is_none());
    }
}
