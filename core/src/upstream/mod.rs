pub mod contract;
pub mod workflow;

pub use contract::{AnalysisSettings, AnalyzeRequest, AnalyzeResponse, ClassifierClient, Overall};
pub use workflow::{analyze, AnalysisOutcome};
