use crate::annotation::model::Annotation;
use serde::{Deserialize, Serialize};

/// Tunable scoring constants.
///
/// Only the ordering is load-bearing: severity dominates confidence, and
/// span length only breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub primary_severity: f64,
    pub primary_confidence: f64,
    pub primary_length: f64,
    pub canonical_severity: f64,
    pub canonical_confidence: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            primary_severity: 1000.0,
            primary_confidence: 100.0,
            primary_length: 0.001,
            canonical_severity: 10.0,
            canonical_confidence: 1.0,
        }
    }
}

impl ScoringWeights {
    /// Score used to keep one of two overlapping findings in canonical mode.
    pub fn canonical_score(&self, a: &Annotation) -> f64 {
        f64::from(a.severity().rank()) * self.canonical_severity
            + a.confidence() * self.canonical_confidence
    }

    /// Score used to pick the primary annotation of a segment.
    pub fn primary_score(&self, a: &Annotation) -> f64 {
        f64::from(a.severity().rank()) * self.primary_severity
            + a.confidence() * self.primary_confidence
            + a.len() as f64 * self.primary_length
    }

    /// Highest primary score; the first candidate wins exact ties.
    pub fn pick_primary<'a>(&self, candidates: &'a [Annotation]) -> Option<&'a Annotation> {
        let mut best: Option<(&Annotation, f64)> = None;
        for a in candidates {
            let score = self.primary_score(a);
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((a, score)),
            }
        }
        best.map(|(a, _)| a)
    }
}
