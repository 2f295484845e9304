use crate::color::palette::Palette;
use crate::error::{CoreError, CoreResult};
use crate::render::fuzzy::FuzzyWindows;
use crate::resolve::scoring::ScoringWeights;
use crate::resolve::DEFAULT_MAX_FINDINGS;
use crate::selection::correlator::DEFAULT_EMPHASIS_MS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Everything tunable about the engine. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub palette: Palette,
    pub scoring: ScoringWeights,
    pub max_findings: usize,
    /// Background alpha of a list item while hovered.
    pub hover_alpha: f64,
    pub emphasis_ms: u64,
    pub fuzzy: FuzzyWindows,
    pub upstream_endpoint: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            palette: Palette::default(),
            scoring: ScoringWeights::default(),
            max_findings: DEFAULT_MAX_FINDINGS,
            hover_alpha: 0.10,
            emphasis_ms: DEFAULT_EMPHASIS_MS,
            fuzzy: FuzzyWindows::default(),
            upstream_endpoint: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let cfg: EngineConfig = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("engine config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let body = std::fs::read_to_string(path)?;
        Self::from_json_str(&body)
    }

    pub fn validate(&self) -> CoreResult<()> {
        self.palette.validate()?;
        self.fuzzy.validate()?;

        let s = &self.scoring;
        let all = [
            s.primary_severity,
            s.primary_confidence,
            s.primary_length,
            s.canonical_severity,
            s.canonical_confidence,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::Config(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }
        // Confidence is at most 1, so severity dominates only with a larger weight.
        if s.primary_severity <= s.primary_confidence || s.canonical_severity <= s.canonical_confidence {
            return Err(CoreError::Config(
                "severity weight must exceed confidence weight".to_string(),
            ));
        }

        if self.max_findings == 0 || self.max_findings > DEFAULT_MAX_FINDINGS {
            return Err(CoreError::Config(format!(
                "max_findings must be in 1..={}, got {}",
                DEFAULT_MAX_FINDINGS, self.max_findings
            )));
        }
        if !(0.0..=1.0).contains(&self.hover_alpha) {
            return Err(CoreError::Config(format!(
                "hover_alpha must be in [0,1], got {}",
                self.hover_alpha
            )));
        }
        if !(1500..=2000).contains(&self.emphasis_ms) {
            return Err(CoreError::Config(format!(
                "emphasis_ms must be in 1500..=2000, got {}",
                self.emphasis_ms
            )));
        }
        if let Some(endpoint) = &self.upstream_endpoint {
            let url = Url::parse(endpoint)
                .map_err(|e| CoreError::Config(format!("upstream_endpoint {}: {}", endpoint, e)))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(CoreError::Config(format!(
                    "upstream_endpoint must be http(s), got {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = EngineConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.emphasis_ms, 1750);
        assert_eq!(cfg.max_findings, 12);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"emphasis_ms": 1600}"#).unwrap();
        assert_eq!(cfg.emphasis_ms, 1600);
        assert_eq!(cfg.palette, Palette::default());
    }

    #[test]
    fn rejects_bad_endpoint() {
        let err = EngineConfig::from_json_str(r#"{"upstream_endpoint": "ftp://x/analyze"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
        assert!(EngineConfig::from_json_str(r#"{"upstream_endpoint": "not a url"}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"upstream_endpoint": "https://api.example.com/analyze"}"#).is_ok());
    }

    #[test]
    fn rejects_unknown_keys_and_out_of_range() {
        assert!(EngineConfig::from_json_str(r#"{"colour": 1}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"max_findings": 40}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"emphasis_ms": 10}"#).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("engine.json");
        std::fs::write(&p, r#"{"hover_alpha": 0.2}"#).unwrap();
        assert_eq!(EngineConfig::load(&p).unwrap().hover_alpha, 0.2);
    }
}
