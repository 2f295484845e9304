pub mod canonical;
pub mod filter;
pub mod partition;
pub mod scoring;

use crate::annotation::model::Annotation;
use crate::annotation::text_index::unit_len;
use crate::diagnostics::event::DropRecord;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

pub use filter::CategoryFilter;
pub use partition::Segment;
pub use scoring::ScoringWeights;

pub const DEFAULT_MAX_FINDINGS: usize = 12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// One strictly non-overlapping, capped finding set (what the server returns).
    Canonical,
    /// Full partition of the text that keeps overlapping categories together.
    Partition,
}

impl ResolveMode {
    pub fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "canonical" => Ok(ResolveMode::Canonical),
            "partition" => Ok(ResolveMode::Partition),
            _ => Err(CoreError::InvalidInput(format!(
                "invalid resolve mode: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveOutcome {
    pub segments: Vec<Segment>,
    pub dropped: Vec<DropRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapResolver {
    pub weights: ScoringWeights,
    pub max_findings: usize,
}

impl Default for OverlapResolver {
    fn default() -> Self {
        OverlapResolver {
            weights: ScoringWeights::default(),
            max_findings: DEFAULT_MAX_FINDINGS,
        }
    }
}

impl OverlapResolver {
    pub fn new(weights: ScoringWeights, max_findings: usize) -> Self {
        OverlapResolver {
            weights,
            max_findings,
        }
    }

    pub fn canonicalize(&self, annotations: &[Annotation]) -> (Vec<Annotation>, Vec<DropRecord>) {
        canonical::canonicalize(annotations, self.max_findings, &self.weights)
    }

    pub fn resolve(
        &self,
        text: &str,
        annotations: &[Annotation],
        mode: ResolveMode,
    ) -> CoreResult<ResolveOutcome> {
        let text_len = unit_len(text);
        if let Some(a) = annotations.iter().find(|a| a.end() > text_len) {
            return Err(CoreError::InvalidInput(format!(
                "annotation {} ends at {} beyond text length {}; validate against this text first",
                a.id(),
                a.end(),
                text_len
            )));
        }

        match mode {
            ResolveMode::Partition => Ok(ResolveOutcome {
                segments: partition::partition(text_len, annotations, &self.weights),
                dropped: Vec::new(),
            }),
            ResolveMode::Canonical => {
                let (kept, dropped) = self.canonicalize(annotations);
                Ok(ResolveOutcome {
                    segments: partition::partition(text_len, &kept, &self.weights),
                    dropped,
                })
            }
        }
    }

    /// Resolve only the annotations whose category the filter leaves enabled.
    pub fn resolve_filtered(
        &self,
        text: &str,
        annotations: &[Annotation],
        mode: ResolveMode,
        filter: &CategoryFilter,
    ) -> CoreResult<ResolveOutcome> {
        let visible = filter.apply(annotations);
        self.resolve(text, &visible, mode)
    }
}

/// Resolve with default scoring and the default findings cap.
pub fn resolve(
    text: &str,
    annotations: &[Annotation],
    mode: ResolveMode,
) -> CoreResult<Vec<Segment>> {
    Ok(OverlapResolver::default()
        .resolve(text, annotations, mode)?
        .segments)
}
