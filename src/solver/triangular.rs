//! Forward and back substitution on sparse triangular matrices.
//!
//! Only the triangle that the substitution reads is touched; entries on the
//! other side of the diagonal are ignored. A zero on the diagonal is reported
//! as [`LaError::ZeroPivot`] instead of producing infinities.

use crate::core::traits::MatShape;
use crate::error::{LaError, Result};
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::SparseVector;

fn check_system(a: &SparseMatrix, y: &SparseVector, op: &str) -> Result<()> {
    check_square(a, op)?;
    if y.len() != a.nrows() {
        return Err(LaError::DimensionMismatch(format!(
            "{}: {}x{} matrix and right-hand side of length {}",
            op,
            a.nrows(),
            a.ncols(),
            y.len()
        )));
    }
    Ok(())
}

pub(crate) fn check_square(a: &SparseMatrix, op: &str) -> Result<()> {
    if !a.is_square() {
        return Err(LaError::DimensionMismatch(format!(
            "{}: matrix is not square ({}x{})",
            op,
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(())
}

/// Solve `L x = y` for lower-triangular `L` by forward substitution.
///
/// `x[i] = (y[i] - Σ_{j<i} L[i][j] x[j]) / L[i][i]`; the result is a column
/// vector.
pub fn solve_lower_triangular(l: &SparseMatrix, y: &SparseVector) -> Result<SparseVector> {
    check_system(l, y, "lower-triangular solve")?;
    let n = l.nrows();
    let mut x = SparseVector::column(n);
    for i in 0..n {
        let row = l.stored_row(i).ok_or(LaError::ZeroPivot(i))?;
        let sum: f64 = row
            .range(0..i)
            .filter_map(|(j, lij)| x.lookup(j).map(|xj| lij * xj))
            .sum();
        let pivot = row.lookup(i).unwrap_or(0.0);
        if pivot == 0.0 {
            return Err(LaError::ZeroPivot(i));
        }
        x.set_unchecked(i, (y.lookup(i).unwrap_or(0.0) - sum) / pivot);
    }
    Ok(x)
}

/// Solve `U x = y` for upper-triangular `U` by back substitution.
pub fn solve_upper_triangular(u: &SparseMatrix, y: &SparseVector) -> Result<SparseVector> {
    check_system(u, y, "upper-triangular solve")?;
    let n = u.nrows();
    let mut x = SparseVector::column(n);
    for i in (0..n).rev() {
        let row = u.stored_row(i).ok_or(LaError::ZeroPivot(i))?;
        let sum: f64 = row
            .range(i + 1..n)
            .filter_map(|(j, uij)| x.lookup(j).map(|xj| uij * xj))
            .sum();
        let pivot = row.lookup(i).unwrap_or(0.0);
        if pivot == 0.0 {
            return Err(LaError::ZeroPivot(i));
        }
        x.set_unchecked(i, (y.lookup(i).unwrap_or(0.0) - sum) / pivot);
    }
    Ok(x)
}

/// Inverse of a lower-triangular matrix, one identity column at a time.
pub fn invert_lower_triangular(l: &SparseMatrix) -> Result<SparseMatrix> {
    check_square(l, "lower-triangular inversion")?;
    let n = l.nrows();
    let mut inverse = SparseMatrix::new(n, n);
    for j in 0..n {
        let mut rhs = SparseVector::column(n);
        rhs.set_unchecked(j, 1.0);
        let column = solve_lower_triangular(l, &rhs)?;
        inverse.set_column_mut(j, &column)?;
    }
    Ok(inverse)
}
