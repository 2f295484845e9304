use highlight_core::config::EngineConfig;
use highlight_core::error::{CoreError, CoreResult};
use highlight_core::upstream::{analyze, AnalysisSettings, AnalyzeRequest, AnalyzeResponse, ClassifierClient};
use serde_json::json;
use std::cell::RefCell;

struct CannedClient {
    response: serde_json::Value,
    seen: RefCell<Vec<AnalyzeRequest>>,
}

impl CannedClient {
    fn new(response: serde_json::Value) -> Self {
        CannedClient {
            response,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl ClassifierClient for CannedClient {
    fn analyze(&self, req: &AnalyzeRequest) -> CoreResult<AnalyzeResponse> {
        self.seen.borrow_mut().push(req.clone());
        Ok(serde_json::from_value(self.response.clone())?)
    }
}

struct DownClient;

impl ClassifierClient for DownClient {
    fn analyze(&self, _req: &AnalyzeRequest) -> CoreResult<AnalyzeResponse> {
        Err(CoreError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "classifier timed out",
        )))
    }
}

const TEXT: &str = "Line one.\r\nYou either agree or you hate freedom.\r\nAct now!";

fn response() -> serde_json::Value {
    json!({
        "overall": {"logicScore": 30, "biasScore": 120, "verifiabilityScore": 45},
        "findings": [
            {"id": "f1", "category": "fallacy", "severity": "high", "confidence": 0.9,
             "start": 10, "end": 46, "quote": "You either agree or you hate freedom"},
            {"id": "f2", "category": "bias", "severity": "low", "confidence": 0.8,
             "start": 34, "end": 46, "quote": "hate freedom"},
            {"id": "f3", "category": "tactic", "severity": "medium", "confidence": 0.7,
             "start": 48, "end": 56, "quote": "Act now!"},
            {"id": "f4", "category": "fallacy"}
        ]
    })
}

#[test]
fn analysis_normalizes_validates_and_canonicalizes() {
    let client = CannedClient::new(response());
    let out = analyze(&client, TEXT, &AnalysisSettings::default(), &EngineConfig::default()).unwrap();

    assert_eq!(client.seen.borrow()[0].text, "Line one.\nYou either agree or you hate freedom.\nAct now!");
    assert_eq!(out.text, client.seen.borrow()[0].text);
    let ids: Vec<&str> = out.findings.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["f1", "f3"]);
    assert_eq!(out.overall.bias_score, 100);
    assert_eq!(out.credibility_score, 58);

    let types: Vec<&str> = out.events.iter().map(|e| e.event_type.as_str()).collect();
    assert!(types.contains(&"ANNOTATION_DROPPED"));
    assert!(types.contains(&"FINDING_SUPERSEDED"));
    assert_eq!(types.last(), Some(&"ANALYSIS_COMPLETED"));
    assert_eq!(out.events.last().unwrap().details["findings_received"], 4);
}

#[test]
fn disabled_detection_removes_category_before_overlap() {
    let client = CannedClient::new(response());
    let settings = AnalysisSettings {
        detect_fallacies: false,
        max_findings: Some(1),
        ..AnalysisSettings::default()
    };
    let out = analyze(&client, TEXT, &settings, &EngineConfig::default()).unwrap();
    let ids: Vec<&str> = out.findings.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["f3"]);
}

#[test]
fn blank_text_and_client_failure_are_errors() {
    let client = CannedClient::new(response());
    let err = analyze(&client, "  \n ", &AnalysisSettings::default(), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert!(client.seen.borrow().is_empty());

    let err = analyze(&DownClient, TEXT, &AnalysisSettings::default(), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, CoreError::Upstream(_)));
}

#[test]
fn missing_findings_means_none() {
    let client = CannedClient::new(json!({"overall": {"logicScore": 80, "biasScore": 80, "verifiabilityScore": 80}}));
    let out = analyze(&client, "Plain text.", &AnalysisSettings::default(), &EngineConfig::default()).unwrap();
    assert!(out.findings.is_empty());
    assert_eq!(out.credibility_score, 80);
}
