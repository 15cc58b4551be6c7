//! Direct solvers: triangular substitution and Cholesky factorization.

use crate::utils::convergence::SolveStats;

/// Common interface for solvers of `A·x = b`.
pub trait LinearSolver<M, V> {
    type Error;
    /// Solve A·x = b, writing the result into `x`.
    fn solve(
        &mut self,
        a: &M,
        b: &V,
        x: &mut V,
    ) -> Result<SolveStats<<Self as LinearSolver<M, V>>::Scalar>, Self::Error>;
    type Scalar: Copy + PartialOrd + From<f64>;
}

pub mod triangular;
pub use triangular::{invert_lower_triangular, solve_lower_triangular, solve_upper_triangular};

pub mod cholesky;
pub use cholesky::{CholeskySolver, cholesky_lower};
