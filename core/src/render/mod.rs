pub mod fuzzy;
pub mod html;
pub mod pass;
pub mod runs;

pub use pass::{PassReport, RenderPass, RenderTarget};
pub use runs::{render, render_segments, RenderedRun};
