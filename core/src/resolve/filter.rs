use crate::annotation::model::{Annotation, Category};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which categories are currently shown. Everything is enabled unless
/// explicitly disabled, so categories unknown at build time stay visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    disabled: BTreeSet<Category>,
}

impl CategoryFilter {
    pub fn all_enabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, category: &Category) -> bool {
        !self.disabled.contains(category)
    }

    pub fn disable(&mut self, category: Category) {
        self.disabled.insert(category);
    }

    pub fn enable(&mut self, category: &Category) {
        self.disabled.remove(category);
    }

    /// Flip a category; returns whether it is enabled afterwards.
    pub fn toggle(&mut self, category: Category) -> bool {
        if self.disabled.remove(&category) {
            true
        } else {
            self.disabled.insert(category);
            false
        }
    }

    pub fn with_disabled(mut self, category: Category) -> Self {
        self.disable(category);
        self
    }

    pub fn apply(&self, annotations: &[Annotation]) -> Vec<Annotation> {
        annotations
            .iter()
            .filter(|a| self.is_enabled(a.category()))
            .cloned()
            .collect()
    }
}
