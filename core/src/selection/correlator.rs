use crate::annotation::model::{Annotation, Category};
use crate::diagnostics::event::{Component, DiagnosticEvent};
use crate::resolve::filter::CategoryFilter;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_EMPHASIS_MS: u64 = 1750;

/// Which view an effect is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTarget {
    /// The highlighted runs in the text.
    Highlight,
    /// The findings list next to the text.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SelectionEffect {
    ScrollIntoView {
        target: SelectionTarget,
        id: String,
    },
    Emphasize {
        target: SelectionTarget,
        id: String,
        until_ms: u64,
    },
    RevertEmphasis {
        target: SelectionTarget,
        id: String,
    },
    Cleared {
        id: String,
        reason: ClearReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    CategoryDisabled,
    AnnotationRemoved,
}

impl ClearReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ClearReason::CategoryDisabled => "category_disabled",
            ClearReason::AnnotationRemoved => "annotation_removed",
        }
    }
}

impl SelectionEffect {
    /// `SELECTION_CLEARED` diagnostic for a `Cleared` effect.
    pub fn to_event(&self) -> Option<DiagnosticEvent> {
        match self {
            SelectionEffect::Cleared { id, reason } => Some(DiagnosticEvent::new(
                "SELECTION_CLEARED",
                Component::SelectionCorrelator,
                serde_json::json!({
                    "annotation_id": id,
                    "reason": reason.as_str(),
                }),
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEmphasis {
    target: SelectionTarget,
    id: String,
    until_ms: u64,
}

/// Keeps the findings list and the highlighted text pointing at the same
/// annotation. Time is passed in by the caller.
#[derive(Debug, Clone)]
pub struct SelectionCorrelator {
    selected: Option<String>,
    index: BTreeMap<String, Category>,
    filter: CategoryFilter,
    emphasis_ms: u64,
    pending: Vec<PendingEmphasis>,
}

impl Default for SelectionCorrelator {
    fn default() -> Self {
        SelectionCorrelator::new(DEFAULT_EMPHASIS_MS)
    }
}

impl SelectionCorrelator {
    pub fn new(emphasis_ms: u64) -> Self {
        SelectionCorrelator {
            selected: None,
            index: BTreeMap::new(),
            filter: CategoryFilter::all_enabled(),
            emphasis_ms,
            pending: Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Known and its category enabled.
    pub fn is_visible(&self, id: &str) -> bool {
        self.index
            .get(id)
            .map(|c| self.filter.is_enabled(c))
            .unwrap_or(false)
    }

    /// Replace the annotation batch. A selection whose id is gone is cleared.
    pub fn set_annotations(&mut self, batch: &[Annotation]) -> Vec<SelectionEffect> {
        self.index = batch
            .iter()
            .map(|a| (a.id().to_string(), a.category().clone()))
            .collect();
        self.pending.retain(|p| batch.iter().any(|a| a.id() == p.id));
        match &self.selected {
            Some(id) if !self.index.contains_key(id) => {
                self.clear_selection(ClearReason::AnnotationRemoved)
            }
            _ => Vec::new(),
        }
    }

    /// Selection coming from the findings list; effects address the text.
    /// Selecting the current selection again re-flashes it with a new deadline.
    pub fn select(&mut self, id: &str, now_ms: u64) -> Vec<SelectionEffect> {
        self.select_into(id, now_ms, SelectionTarget::Highlight)
    }

    /// Click on a highlighted run (its primary id); effects address the list.
    pub fn on_highlight_click(&mut self, id: &str, now_ms: u64) -> Vec<SelectionEffect> {
        self.select_into(id, now_ms, SelectionTarget::List)
    }

    fn select_into(
        &mut self,
        id: &str,
        now_ms: u64,
        target: SelectionTarget,
    ) -> Vec<SelectionEffect> {
        if !self.is_visible(id) {
            debug!(id, "ignoring selection of unknown or hidden annotation");
            return Vec::new();
        }
        self.selected = Some(id.to_string());
        let until_ms = now_ms.saturating_add(self.emphasis_ms);
        self.pending.retain(|p| !(p.id == id && p.target == target));
        self.pending.push(PendingEmphasis {
            target,
            id: id.to_string(),
            until_ms,
        });
        vec![
            SelectionEffect::ScrollIntoView {
                target,
                id: id.to_string(),
            },
            SelectionEffect::Emphasize {
                target,
                id: id.to_string(),
                until_ms,
            },
        ]
    }

    /// Emphasis whose deadline is at or before `now_ms`, oldest first.
    pub fn tick(&mut self, now_ms: u64) -> Vec<SelectionEffect> {
        let mut due = Vec::new();
        self.pending.retain(|p| {
            if p.until_ms <= now_ms {
                due.push(SelectionEffect::RevertEmphasis {
                    target: p.target,
                    id: p.id.clone(),
                });
                false
            } else {
                true
            }
        });
        due
    }

    /// Swap the category filter. A selection that becomes hidden is cleared.
    pub fn set_enabled_categories(&mut self, filter: CategoryFilter) -> Vec<SelectionEffect> {
        self.filter = filter;
        match &self.selected {
            Some(id) if !self.is_visible(id) => self.clear_selection(ClearReason::CategoryDisabled),
            _ => Vec::new(),
        }
    }

    fn clear_selection(&mut self, reason: ClearReason) -> Vec<SelectionEffect> {
        match self.selected.take() {
            Some(id) => {
                debug!(id = %id, reason = reason.as_str(), "selection cleared");
                vec![SelectionEffect::Cleared { id, reason }]
            }
            None => Vec::new(),
        }
    }
}
