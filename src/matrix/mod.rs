//! Matrix module: sparse vector and matrix types, and dense interop.

pub mod sparse_vector;
pub use sparse_vector::{Entries, Orientation, SparseVector};
pub mod sparse;
pub use sparse::{RowMut, Rows, SparseMatrix};
pub mod dense;
