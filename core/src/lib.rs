pub mod annotation;
pub mod color;
pub mod config;
pub mod determinism;
pub mod diagnostics;
pub mod render;
pub mod resolve;
pub mod selection;
pub mod upstream;

pub mod error;

pub use annotation::{validate, Annotation, Category, RawAnnotation, Severity};
pub use color::{blend, BlendedColor, Palette};
pub use config::EngineConfig;
pub use error::{CoreError, CoreResult};
pub use render::{render, RenderedRun};
pub use resolve::{resolve, ResolveMode, Segment};
pub use selection::{SelectionCorrelator, SelectionEffect};
