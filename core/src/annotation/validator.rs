use crate::annotation::model::{Annotation, RawAnnotation};
use crate::annotation::text_index::{unit_len, TextIndex};
use crate::diagnostics::event::{DropReason, DropRecord};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub received: usize,
    pub accepted: usize,
    pub dropped: Vec<DropRecord>,
}

/// Repair and validate raw annotations against `text`.
///
/// Offsets are clamped into the text and swapped if reversed. When the
/// clamped slice does not equal the quote, the first exact occurrence of
/// the quote is tried instead. Anything that still does not match is dropped.
pub fn validate(text: &str, raw: &[RawAnnotation]) -> Vec<Annotation> {
    validate_with_report(text, raw).0
}

pub fn validate_with_report(
    text: &str,
    raw: &[RawAnnotation],
) -> (Vec<Annotation>, ValidationReport) {
    validate_indexed(text, raw.iter().enumerate(), Vec::new(), raw.len())
}

/// Boundary entry point for loosely typed payloads.
///
/// A non-string `text` or a non-array `annotations` is caller misuse and
/// fails fast. Individual elements that do not fit the annotation schema are
/// upstream noise and are only dropped.
pub fn validate_json(text: &Value, annotations: &Value) -> CoreResult<(Vec<Annotation>, ValidationReport)> {
    let text = text.as_str().ok_or_else(|| {
        CoreError::ContractViolation(format!("text must be a string, got {}", json_kind(text)))
    })?;
    let (parsed, malformed) = parse_raw_annotations(annotations)?;
    let received = parsed.len() + malformed.len();
    Ok(validate_indexed(
        text,
        parsed.iter().map(|(i, r)| (*i, r)),
        malformed,
        received,
    ))
}

/// Split a JSON array into well-formed raw annotations (with their array
/// index) and drop records for the elements that are not.
pub fn parse_raw_annotations(
    annotations: &Value,
) -> CoreResult<(Vec<(usize, RawAnnotation)>, Vec<DropRecord>)> {
    let items = annotations.as_array().ok_or_else(|| {
        CoreError::ContractViolation(format!(
            "annotations must be an array, got {}",
            json_kind(annotations)
        ))
    })?;

    let mut parsed = Vec::with_capacity(items.len());
    let mut malformed = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match serde_json::from_value::<RawAnnotation>(item.clone()) {
            Ok(raw) => parsed.push((i, raw)),
            Err(e) => {
                let id = item.get("id").and_then(|v| v.as_str()).map(str::to_string);
                debug!(index = i, error = %e, "malformed annotation dropped");
                malformed.push(DropRecord {
                    index: i,
                    annotation_id: id,
                    reason: DropReason::MALFORMED_ANNOTATION,
                    detail: e.to_string(),
                });
            }
        }
    }
    Ok((parsed, malformed))
}

fn validate_indexed<'r>(
    text: &str,
    items: impl Iterator<Item = (usize, &'r RawAnnotation)>,
    mut dropped: Vec<DropRecord>,
    received: usize,
) -> (Vec<Annotation>, ValidationReport) {
    let index = TextIndex::new(text);
    let mut accepted = Vec::new();

    for (i, raw) in items {
        match check_span(&index, raw) {
            Ok(a) => accepted.push(a),
            Err((reason, detail)) => {
                debug!(
                    index = i,
                    id = %raw.id,
                    reason = reason.as_str(),
                    "annotation dropped: {}",
                    detail
                );
                dropped.push(DropRecord {
                    index: i,
                    annotation_id: Some(raw.id.clone()),
                    reason,
                    detail,
                });
            }
        }
    }

    dropped.sort_by_key(|d| d.index);
    let report = ValidationReport {
        received,
        accepted: accepted.len(),
        dropped,
    };
    (accepted, report)
}

fn check_span(
    index: &TextIndex<'_>,
    raw: &RawAnnotation,
) -> Result<Annotation, (DropReason, String)> {
    if !(raw.confidence.is_finite() && (0.0..=1.0).contains(&raw.confidence)) {
        return Err((
            DropReason::INVALID_CONFIDENCE,
            format!("confidence {} outside [0, 1]", raw.confidence),
        ));
    }
    if raw.quote.is_empty() {
        return Err((DropReason::DEGENERATE_SPAN, "empty quote".to_string()));
    }

    let n = index.len_units() as i64;
    let mut start = index.snap(raw.start.clamp(0, n) as usize);
    let mut end = index.snap(raw.end.clamp(0, n) as usize);
    if end < start {
        std::mem::swap(&mut start, &mut end);
    }

    if index.slice(start, end) != raw.quote {
        if let Some(found) = index.find(&raw.quote) {
            start = found;
            end = found + unit_len(&raw.quote);
        }
    }

    if index.slice(start, end) != raw.quote {
        return Err((
            DropReason::OFFSET_MISMATCH,
            format!(
                "quote not found at [{}, {}) nor anywhere in text",
                start, end
            ),
        ));
    }
    if end <= start {
        return Err((
            DropReason::DEGENERATE_SPAN,
            format!("empty span [{}, {})", start, end),
        ));
    }
    Ok(Annotation::from_checked(raw, start, end))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
