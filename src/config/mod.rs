//! Option structs for the parallel products and the text format.

pub mod options;
pub use options::{ParallelOptions, TextFormatOptions};
