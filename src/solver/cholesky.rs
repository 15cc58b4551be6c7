//! Sparse Cholesky factorization `A = L Lᵀ`.
//!
//! The factor is built row by row. For `c <= r`,
//!
//! ```text
//! L[r][c] = (A[r][c] - Σ_{k<c} L[r][k] L[c][k]) / L[c][c]      (c < r)
//! L[r][r] = sqrt(A[r][r] - Σ_{k<r} L[r][k]²)
//! ```
//!
//! Only the lower triangle of `A` is read, so the caller must supply a
//! symmetric matrix. A diagonal radicand that is not strictly positive stops
//! the factorization with [`LaError::NotPositiveDefinite`].
//!
//! [`CholeskySolver`] caches the factor and its transpose so repeated
//! right-hand sides only pay for the two triangular solves.

use tracing::{debug, trace};

use crate::algebra::product::mat_vec;
use crate::algebra::vector::sub;
use crate::error::{LaError, Result};
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::SparseVector;
use crate::solver::LinearSolver;
use crate::solver::triangular::{check_square, solve_lower_triangular, solve_upper_triangular};
use crate::utils::convergence::SolveStats;

/// Lower-triangular `L` with `A = L Lᵀ`.
pub fn cholesky_lower(a: &SparseMatrix) -> Result<SparseMatrix> {
    check_square(a, "Cholesky factorization")?;
    let n = a.nrows();
    let mut l = SparseMatrix::new(n, n);
    for r in 0..n {
        for c in 0..=r {
            let sum = partial_dot(&l, r, c);
            let residual = a.lookup(r, c).unwrap_or(0.0) - sum;
            if c == r {
                if residual.is_nan() || residual <= 0.0 {
                    return Err(LaError::NotPositiveDefinite { row: r, value: residual });
                }
                l.empty_row(r).set_unchecked(r, residual.sqrt());
            } else if residual != 0.0 {
                // L[c][c] was stored when row c was finished and is positive.
                let pivot = l.lookup(c, c).unwrap_or(f64::NAN);
                l.empty_row(r).set_unchecked(c, residual / pivot);
            }
        }
        trace!(row = r, "cholesky row complete");
    }
    debug!(n, nnz = l.nnz(), "cholesky factorization complete");
    Ok(l)
}

/// `Σ_{k<c} L[r][k] L[c][k]`, walking the stored prefix of row `c`.
fn partial_dot(l: &SparseMatrix, r: usize, c: usize) -> f64 {
    match (l.stored_row(r), l.stored_row(c)) {
        (Some(row_r), Some(row_c)) => row_c
            .range(0..c)
            .filter_map(|(k, lck)| row_r.lookup(k).map(|lrk| lrk * lck))
            .sum(),
        _ => 0.0,
    }
}

/// Direct solver for symmetric positive-definite systems.
#[derive(Debug, Clone, Default)]
pub struct CholeskySolver {
    /// Cached `(L, Lᵀ)` from the last factorization.
    factor: Option<(SparseMatrix, SparseMatrix)>,
}

impl CholeskySolver {
    pub fn new() -> Self {
        CholeskySolver { factor: None }
    }

    /// Factor `a` and cache the result, replacing any earlier factor.
    pub fn factor(&mut self, a: &SparseMatrix) -> Result<()> {
        let l = cholesky_lower(a)?;
        let lt = l.transpose();
        self.factor = Some((l, lt));
        Ok(())
    }

    /// The cached lower factor, if [`factor`](Self::factor) has run.
    pub fn lower(&self) -> Option<&SparseMatrix> {
        self.factor.as_ref().map(|(l, _)| l)
    }

    /// Solve with the cached factor: `L y = b`, then `Lᵀ x = y`.
    pub fn solve_cached(&self, b: &SparseVector) -> Result<SparseVector> {
        let (l, lt) = self.factor.as_ref().ok_or_else(|| {
            LaError::InvalidArgument("CholeskySolver: solve_cached called before factorization".into())
        })?;
        let y = solve_lower_triangular(l, b)?;
        solve_upper_triangular(lt, &y)
    }
}

impl LinearSolver<SparseMatrix, SparseVector> for CholeskySolver {
    type Error = LaError;
    type Scalar = f64;

    /// Factor `a`, solve, and report the residual norm `‖b - A x‖`.
    fn solve(&mut self, a: &SparseMatrix, b: &SparseVector, x: &mut SparseVector) -> Result<SolveStats<f64>> {
        self.factor(a)?;
        *x = self.solve_cached(b)?;
        let residual = sub(b, &mat_vec(a, x)?)?.norm();
        debug!(residual, "cholesky solve complete");
        Ok(SolveStats {
            iterations: 1,
            final_residual: residual,
            converged: true,
        })
    }
}
