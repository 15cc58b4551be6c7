//! Core traits shared by the sparse and dense types.

pub mod traits;
pub use traits::{MatShape, MatVec};
