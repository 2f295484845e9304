use crate::annotation::model::Annotation;
use crate::annotation::text_index::unit_len;
use crate::annotation::validator::validate_json;
use crate::config::EngineConfig;
use crate::diagnostics::event::{Component, DiagnosticEvent, DropRecord};
use crate::error::{CoreError, CoreResult};
use crate::resolve::canonical::canonicalize;
use crate::upstream::contract::{AnalysisSettings, AnalyzeRequest, ClassifierClient, Overall};
use serde::Serialize;
use tracing::{debug, warn};

/// What the analysis endpoint returns: the normalized text the offsets refer
/// to, the headline scores and a canonical finding set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub text: String,
    pub overall: Overall,
    pub credibility_score: i64,
    pub findings: Vec<Annotation>,
    #[serde(skip)]
    pub dropped: Vec<DropRecord>,
    #[serde(skip)]
    pub events: Vec<DiagnosticEvent>,
}

/// Line endings are normalized exactly once; every offset downstream refers
/// to the normalized string.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Analyze `text`: normalize, call the classifier, then validate and
/// canonicalize what it returned.
///
/// Findings in categories switched off in `settings` are removed before
/// overlap resolution so they cannot displace enabled ones.
pub fn analyze<C: ClassifierClient + ?Sized>(
    client: &C,
    text: &str,
    settings: &AnalysisSettings,
    config: &EngineConfig,
) -> CoreResult<AnalysisOutcome> {
    if text.trim().is_empty() {
        return Err(CoreError::InvalidInput("missing 'text'".to_string()));
    }
    let normalized = normalize_line_endings(text);

    let req = AnalyzeRequest {
        text: normalized.clone(),
        settings: settings.clone(),
    };
    let resp = client.analyze(&req).map_err(|e| {
        warn!(error = %e, "classifier call failed");
        match e {
            CoreError::Upstream(_) => e,
            other => CoreError::Upstream(other.to_string()),
        }
    })?;

    let findings = if resp.findings.is_null() {
        serde_json::Value::Array(Vec::new())
    } else {
        resp.findings
    };
    let text_value = serde_json::Value::String(normalized.clone());
    let (validated, report) = validate_json(&text_value, &findings)?;

    let enabled = settings.category_filter().apply(&validated);
    if enabled.len() != validated.len() {
        debug!(
            removed = validated.len() - enabled.len(),
            "findings in disabled categories removed"
        );
    }

    let max = settings.effective_max_findings().min(config.max_findings);
    let (kept, superseded) = canonicalize(&enabled, max, &config.scoring);

    let mut dropped = report.dropped;
    dropped.extend(superseded);

    let mut events: Vec<DiagnosticEvent> = dropped.iter().map(DiagnosticEvent::from_drop).collect();
    events.push(DiagnosticEvent::new(
        "ANALYSIS_COMPLETED",
        Component::Upstream,
        serde_json::json!({
            "findings_received": report.received,
            "findings_kept": kept.len(),
            "text_units": unit_len(&normalized),
        }),
    ));

    let overall = resp.overall.clamped();
    Ok(AnalysisOutcome {
        text: normalized,
        credibility_score: overall.credibility_score(),
        overall,
        findings: kept,
        dropped,
        events,
    })
}

/// `ANALYSIS_FAILED` event for an error returned by [`analyze`].
pub fn failure_event(err: &CoreError) -> DiagnosticEvent {
    DiagnosticEvent::new(
        "ANALYSIS_FAILED",
        Component::Upstream,
        serde_json::json!({ "error_message": err.to_string() }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_is_normalized_once() {
        assert_eq!(normalize_line_endings("a\r\nb\r\n\r\nc"), "a\nb\n\nc");
        assert_eq!(normalize_line_endings("a\rb"), "a\rb");
    }

    #[test]
    fn failure_event_is_in_taxonomy() {
        let mut ev = failure_event(&CoreError::Upstream("timeout".to_string()));
        ev.prev_event_hash = crate::diagnostics::event::ZERO_HASH_64.to_string();
        assert!(crate::diagnostics::event::finalize_event(ev).is_ok());
    }
}
