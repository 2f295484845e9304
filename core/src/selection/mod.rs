pub mod correlator;

pub use correlator::{ClearReason, SelectionCorrelator, SelectionEffect, SelectionTarget};
