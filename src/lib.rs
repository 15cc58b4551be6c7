//! sparsela: sparse vectors and matrices over ordered coordinate maps
//!
//! This crate provides sparsity-preserving vector and matrix algebra, sparse
//! Cholesky and triangular solvers, a row-partitioned parallel product, and a
//! plain text format, with interop to dense `faer` matrices.

pub mod algebra;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod matrix;
pub mod parallel;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use crate::algebra::*;
pub use crate::config::*;
pub use crate::core::*;
pub use crate::error::{LaError, Result};
pub use crate::matrix::*;
pub use crate::parallel::{parallel_mat_mat, parallel_mat_vec, partition_rows, ParallelProduct};
pub use crate::solver::*;

// Re-export SolveStats at the crate root for convenience
pub use crate::utils::convergence::SolveStats;
