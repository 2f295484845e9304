use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding category. Unknown strings from the classifier are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Bias,
    Fallacy,
    Tactic,
    FactCheck,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Bias => "bias",
            Category::Fallacy => "fallacy",
            Category::Tactic => "tactic",
            Category::FactCheck => "factcheck",
            Category::Other(s) => s.as_str(),
        }
    }

    pub fn builtin() -> [Category; 4] {
        [
            Category::Bias,
            Category::Fallacy,
            Category::Tactic,
            Category::FactCheck,
        ]
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bias" => Category::Bias,
            "fallacy" => Category::Fallacy,
            "tactic" => Category::Tactic,
            "factcheck" => Category::FactCheck,
            _ => Category::Other(s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::from(s.to_string())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

/// Annotation exactly as received from the classifier. Nothing here is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnnotation {
    pub id: String,
    pub category: Category,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub label: String,
    pub severity: Severity,
    pub confidence: f64,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    pub quote: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// An annotation whose offsets have been checked against its source text.
///
/// Only the span validator builds these; `text[start..end] == quote` holds
/// for the text it was validated against (offsets count UTF-16 code units).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    id: String,
    category: Category,
    category_id: String,
    label: String,
    severity: Severity,
    confidence: f64,
    start: usize,
    end: usize,
    quote: String,
    explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl Annotation {
    pub(crate) fn from_checked(raw: &RawAnnotation, start: usize, end: usize) -> Self {
        Annotation {
            id: raw.id.clone(),
            category: raw.category.clone(),
            category_id: raw.category_id.clone(),
            label: raw.label.clone(),
            severity: raw.severity,
            confidence: raw.confidence,
            start,
            end,
            quote: raw.quote.clone(),
            explanation: raw.explanation.clone(),
            suggestion: raw.suggestion.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Back to the wire shape, e.g. for returning canonical findings to a client.
    pub fn to_raw(&self) -> RawAnnotation {
        RawAnnotation {
            id: self.id.clone(),
            category: self.category.clone(),
            category_id: self.category_id.clone(),
            label: self.label.clone(),
            severity: self.severity,
            confidence: self.confidence,
            start: self.start as i64,
            end: self.end as i64,
            quote: self.quote.clone(),
            explanation: self.explanation.clone(),
            suggestion: self.suggestion.clone(),
        }
    }
}
