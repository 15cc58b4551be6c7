//! Sparse algebra operators.
//!
//! Free functions over [`SparseVector`](crate::matrix::SparseVector) and
//! [`SparseMatrix`](crate::matrix::SparseMatrix). Every binary operation
//! validates shapes before computing, so a failed call leaves no partial
//! result behind.

pub mod vector;
pub use vector::{add, divide, dot, scale, sub};

pub mod product;
pub use product::{mat_mat, mat_vec, vec_mat};

pub mod elementwise;
pub use elementwise::{
    add_matrices, elementwise_div, elementwise_mul, scale_matrix, sub_matrices, vector_to_diagonal,
    ElementWise,
};
