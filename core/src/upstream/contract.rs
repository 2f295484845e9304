use crate::annotation::model::Category;
use crate::error::CoreResult;
use crate::resolve::filter::CategoryFilter;
use crate::resolve::DEFAULT_MAX_FINDINGS;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUESTED_FINDINGS: usize = 10;

fn enabled() -> bool {
    true
}

/// Client-side analysis settings as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    #[serde(default = "enabled")]
    pub detect_bias: bool,
    #[serde(default = "enabled")]
    pub detect_fallacies: bool,
    #[serde(default = "enabled")]
    pub detect_tactics: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            detect_bias: true,
            detect_fallacies: true,
            detect_tactics: true,
            max_findings: None,
            temperature: None,
        }
    }
}

impl AnalysisSettings {
    /// Requested cap clamped to `1..=12`; 10 when unset.
    pub fn effective_max_findings(&self) -> usize {
        match self.max_findings {
            None => DEFAULT_REQUESTED_FINDINGS,
            Some(n) => n.clamp(1, DEFAULT_MAX_FINDINGS as i64) as usize,
        }
    }

    /// Fact-check and unknown categories have no switch and stay enabled.
    pub fn detects(&self, category: &Category) -> bool {
        match category {
            Category::Bias => self.detect_bias,
            Category::Fallacy => self.detect_fallacies,
            Category::Tactic => self.detect_tactics,
            Category::FactCheck | Category::Other(_) => true,
        }
    }

    pub fn category_filter(&self) -> CategoryFilter {
        Category::builtin()
            .into_iter()
            .filter(|c| !self.detects(c))
            .fold(CategoryFilter::all_enabled(), |f, c| f.with_disabled(c))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

/// Headline scores, each an integer percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overall {
    #[serde(default)]
    pub logic_score: i64,
    #[serde(default)]
    pub bias_score: i64,
    #[serde(default)]
    pub verifiability_score: i64,
}

impl Overall {
    pub fn clamped(self) -> Self {
        Overall {
            logic_score: self.logic_score.clamp(0, 100),
            bias_score: self.bias_score.clamp(0, 100),
            verifiability_score: self.verifiability_score.clamp(0, 100),
        }
    }

    /// Rounded mean of the clamped scores.
    pub fn credibility_score(&self) -> i64 {
        let c = self.clamped();
        let sum = c.logic_score + c.bias_score + c.verifiability_score;
        (sum as f64 / 3.0).round() as i64
    }
}

/// Classifier response before any checking. `findings` is kept loose so a
/// single bad element costs one finding, not the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub overall: Overall,
    #[serde(default)]
    pub findings: serde_json::Value,
}

/// The remote classifier. Implementations own transport and timeouts.
pub trait ClassifierClient {
    fn analyze(&self, req: &AnalyzeRequest) -> CoreResult<AnalyzeResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_findings_is_clamped() {
        let mut s = AnalysisSettings::default();
        assert_eq!(s.effective_max_findings(), 10);
        s.max_findings = Some(50);
        assert_eq!(s.effective_max_findings(), 12);
        s.max_findings = Some(-3);
        assert_eq!(s.effective_max_findings(), 1);
    }

    #[test]
    fn settings_default_when_missing() {
        let s: AnalysisSettings = serde_json::from_str(r#"{"detectTactics": false}"#).unwrap();
        assert!(s.detect_bias && s.detect_fallacies && !s.detect_tactics);
        let f = s.category_filter();
        assert!(!f.is_enabled(&Category::Tactic));
        assert!(f.is_enabled(&Category::Other("satire".to_string())));
    }

    #[test]
    fn credibility_uses_clamped_scores() {
        let o = Overall {
            logic_score: 150,
            bias_score: 40,
            verifiability_score: 51,
        };
        assert_eq!(o.clamped().logic_score, 100);
        assert_eq!(o.credibility_score(), 64);
    }
}
