pub mod model;
pub mod text_index;
pub mod validator;

pub use model::{Annotation, Category, RawAnnotation, Severity};
pub use validator::{validate, validate_json, validate_with_report, ValidationReport};
