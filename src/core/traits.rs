//! Core linear-algebra traits for sparsela.

use crate::error::Result;

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x, overwriting `y`.
    fn matvec(&self, x: &V, y: &mut V) -> Result<()>;
}

/// Matrix dimensions.
pub trait MatShape {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;

    /// Whether the matrix has as many rows as columns.
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}
