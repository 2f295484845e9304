pub mod blend;
pub mod oklab;
pub mod palette;

pub use blend::{blend, BlendedColor};
pub use palette::Palette;
