use crate::determinism::json_canonical;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Why an annotation produced no highlight. None of these are errors.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DropReason {
    OFFSET_MISMATCH,
    DEGENERATE_SPAN,
    MALFORMED_ANNOTATION,
    INVALID_CONFIDENCE,
    OVERLAP_SUPERSEDED,
    OVER_CAPACITY,
    NO_MATCH_IN_RENDER_TARGET,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::OFFSET_MISMATCH => "OFFSET_MISMATCH",
            DropReason::DEGENERATE_SPAN => "DEGENERATE_SPAN",
            DropReason::MALFORMED_ANNOTATION => "MALFORMED_ANNOTATION",
            DropReason::INVALID_CONFIDENCE => "INVALID_CONFIDENCE",
            DropReason::OVERLAP_SUPERSEDED => "OVERLAP_SUPERSEDED",
            DropReason::OVER_CAPACITY => "OVER_CAPACITY",
            DropReason::NO_MATCH_IN_RENDER_TARGET => "NO_MATCH_IN_RENDER_TARGET",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropRecord {
    pub index: usize,
    pub annotation_id: Option<String>,
    pub reason: DropReason,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    SpanValidator,
    OverlapResolver,
    HighlightRenderer,
    SelectionCorrelator,
    Upstream,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub ts_utc: String, // RFC3339 UTC string
    pub event_type: String,
    pub component: Component,
    pub details: serde_json::Value,
    pub prev_event_hash: String, // hex 64
    pub event_hash: String,      // hex 64
}

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

impl DiagnosticEvent {
    pub fn new(event_type: &str, component: Component, details: serde_json::Value) -> Self {
        DiagnosticEvent {
            ts_utc: now_rfc3339_utc(),
            event_type: event_type.to_string(),
            component,
            details,
            prev_event_hash: String::new(),
            event_hash: String::new(),
        }
    }

    pub fn from_drop(record: &DropRecord) -> Self {
        let (event_type, component) = match record.reason {
            DropReason::OVERLAP_SUPERSEDED => ("FINDING_SUPERSEDED", Component::OverlapResolver),
            DropReason::OVER_CAPACITY => ("FINDING_TRUNCATED", Component::OverlapResolver),
            DropReason::NO_MATCH_IN_RENDER_TARGET => {
                ("HIGHLIGHT_NOT_FOUND", Component::HighlightRenderer)
            }
            _ => ("ANNOTATION_DROPPED", Component::SpanValidator),
        };
        DiagnosticEvent::new(
            event_type,
            component,
            serde_json::json!({
                "index": record.index,
                "annotation_id": record.annotation_id,
                "reason": record.reason.as_str(),
                "detail": record.detail,
            }),
        )
    }
}

// event_hash = SHA-256 over the canonical bytes of the event with event_hash zeroed.
pub fn compute_event_hash(event: &DiagnosticEvent) -> CoreResult<String> {
    let mut e = event.clone();
    e.event_hash = ZERO_HASH_64.to_string();
    let bytes = json_canonical::to_canonical_bytes(&e)?;
    let mut h = Sha256::new();
    h.update(bytes);
    Ok(hex::encode(h.finalize()))
}

pub fn finalize_event(mut event: DiagnosticEvent) -> CoreResult<DiagnosticEvent> {
    if event.prev_event_hash.len() != 64
        || !event.prev_event_hash.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(CoreError::InvalidInput(
            "prev_event_hash must be 64 hex chars".to_string(),
        ));
    }
    validate_event_taxonomy(&event)?;
    event.event_hash = compute_event_hash(&event)?;
    Ok(event)
}

fn validate_event_taxonomy(event: &DiagnosticEvent) -> CoreResult<()> {
    let allowed = [
        "ANNOTATION_DROPPED",
        "FINDING_SUPERSEDED",
        "FINDING_TRUNCATED",
        "HIGHLIGHT_NOT_FOUND",
        "ANALYSIS_COMPLETED",
        "ANALYSIS_FAILED",
        "RENDER_PASS_APPLIED",
        "SELECTION_CLEARED",
    ];
    if !allowed.contains(&event.event_type.as_str()) {
        return Err(CoreError::InvalidInput(format!(
            "unknown event_type {}",
            event.event_type
        )));
    }
    for k in required_detail_keys(&event.event_type) {
        if event.details.get(k).is_none() {
            return Err(CoreError::InvalidInput(format!(
                "event {} missing details.{}",
                event.event_type, k
            )));
        }
    }
    Ok(())
}

fn required_detail_keys(event_type: &str) -> &'static [&'static str] {
    match event_type {
        "ANNOTATION_DROPPED" | "FINDING_SUPERSEDED" | "FINDING_TRUNCATED"
        | "HIGHLIGHT_NOT_FOUND" => {
            &["index", "annotation_id", "reason", "detail"]
        }
        "ANALYSIS_COMPLETED" => &["findings_received", "findings_kept", "text_units"],
        "ANALYSIS_FAILED" => &["error_message"],
        "RENDER_PASS_APPLIED" => &["pass_id", "generation", "run_count"],
        "SELECTION_CLEARED" => &["annotation_id", "reason"],
        _ => &[],
    }
}

pub fn now_rfc3339_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
