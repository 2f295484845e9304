use crate::diagnostics::event::{Component, DiagnosticEvent};
use crate::error::CoreResult;
use crate::render::runs::RenderedRun;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;
use ulid::Ulid;

/// Something that displays rendered runs and owns whatever state that needs
/// (nodes, listeners, ids).
pub trait RenderTarget {
    /// Remove everything installed by earlier passes.
    fn clear(&mut self);
    fn install(&mut self, runs: &[RenderedRun]) -> CoreResult<()>;
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PassReport {
    pub pass_id: String,
    pub generation: u64,
    pub run_count: usize,
    pub highlight_count: usize,
    /// Ids that were live before this pass and are gone now.
    pub retired_ids: Vec<String>,
}

impl PassReport {
    pub fn to_event(&self) -> DiagnosticEvent {
        DiagnosticEvent::new(
            "RENDER_PASS_APPLIED",
            Component::HighlightRenderer,
            serde_json::json!({
                "pass_id": self.pass_id,
                "generation": self.generation,
                "run_count": self.run_count,
                "highlight_count": self.highlight_count,
                "retired_ids": self.retired_ids,
            }),
        )
    }
}

/// Replace-in-full application of rendered output.
///
/// Every apply tears the target down before installing the new runs; nothing
/// is patched incrementally. The pass remembers which annotation ids are
/// live so stale ids from an older render can be recognised.
#[derive(Debug, Default)]
pub struct RenderPass {
    generation: u64,
    pass_id: Option<String>,
    live_ids: BTreeSet<String>,
}

impl RenderPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<T: RenderTarget>(
        &mut self,
        target: &mut T,
        runs: &[RenderedRun],
    ) -> CoreResult<PassReport> {
        target.clear();

        let next_ids: BTreeSet<String> = runs
            .iter()
            .flat_map(|r| r.covering_ids().iter().cloned())
            .collect();
        let retired_ids: Vec<String> = self.live_ids.difference(&next_ids).cloned().collect();
        self.live_ids.clear();

        target.install(runs)?;

        self.generation += 1;
        let pass_id = format!("p_{}", Ulid::new());
        self.pass_id = Some(pass_id.clone());
        self.live_ids = next_ids;

        let report = PassReport {
            pass_id,
            generation: self.generation,
            run_count: runs.len(),
            highlight_count: runs.iter().filter(|r| r.is_highlight()).count(),
            retired_ids,
        };
        debug!(
            generation = report.generation,
            runs = report.run_count,
            highlights = report.highlight_count,
            "render pass applied"
        );
        Ok(report)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pass_id(&self) -> Option<&str> {
        self.pass_id.as_deref()
    }

    pub fn is_live(&self, annotation_id: &str) -> bool {
        self.live_ids.contains(annotation_id)
    }
}
