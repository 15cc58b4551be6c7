// SparseMatrix: ordered map from row index to sparse row vector

use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use crate::core::traits::MatShape;
use crate::error::{LaError, Result};
use crate::matrix::sparse_vector::{Orientation, SparseVector};

/// Row-major sparse matrix.
///
/// Only rows that have been written to are stored; every stored row is a
/// row-oriented [`SparseVector`] of length `ncols`. There is no column index,
/// so column access scans the stored rows.
#[derive(Debug, Clone, Default)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    rows: BTreeMap<usize, SparseVector>,
}

impl SparseMatrix {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols, rows: BTreeMap::new() }
    }

    /// n×n identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.empty_row(i).set_unchecked(i, 1.0);
        }
        m
    }

    /// Build from `(row, col, value)` triplets; zeros are skipped and later
    /// duplicates overwrite earlier ones.
    pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut m = Self::new(nrows, ncols);
        for (i, j, value) in triplets {
            m.set(i, j, value)?;
        }
        Ok(m)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries across all rows.
    pub fn nnz(&self) -> usize {
        self.rows.values().map(SparseVector::nnz).sum()
    }

    /// Read-only row `i`. An absent row is synthesized as an empty row
    /// without touching the matrix.
    pub fn row(&self, i: usize) -> Result<Cow<'_, SparseVector>> {
        LaError::check_index(i, self.nrows)?;
        Ok(match self.rows.get(&i) {
            Some(row) => Cow::Borrowed(row),
            None => Cow::Owned(SparseVector::row(self.ncols)),
        })
    }

    /// Mutable row `i`, materializing an empty row if absent.
    ///
    /// The handle writes entries only; the row stays a row of length `ncols`.
    ///
    /// ```compile_fail
    /// let mut m = sparsela::SparseMatrix::new(2, 2);
    /// m.row_mut(0).unwrap().transpose_mut();
    /// ```
    pub fn row_mut(&mut self, i: usize) -> Result<RowMut<'_>> {
        LaError::check_index(i, self.nrows)?;
        Ok(RowMut { row: self.empty_row(i) })
    }

    /// Value at `(i, j)`, `0.0` when absent. Never inserts.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        LaError::check_index(i, self.nrows)?;
        LaError::check_index(j, self.ncols)?;
        Ok(self.lookup(i, j).unwrap_or(0.0))
    }

    /// Mutable reference to `(i, j)`, inserting `0.0` if absent.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut f64> {
        LaError::check_index(i, self.nrows)?;
        self.empty_row(i).get_mut(j)
    }

    /// Set `(i, j)`; a value of exactly zero removes the entry.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        LaError::check_index(i, self.nrows)?;
        LaError::check_index(j, self.ncols)?;
        if value == 0.0 {
            if let Some(row) = self.stored_row_mut(i) {
                row.set_unchecked(j, 0.0);
            }
        } else {
            self.empty_row(i).set_unchecked(j, value);
        }
        Ok(())
    }

    /// Column `j` as a column vector, built by scanning every stored row.
    pub fn column(&self, j: usize) -> Result<SparseVector> {
        LaError::check_index(j, self.ncols)?;
        let mut col = SparseVector::column(self.nrows);
        for (&i, row) in &self.rows {
            if let Some(value) = row.lookup(j) {
                if value != 0.0 {
                    col.set_unchecked(i, value);
                }
            }
        }
        Ok(col)
    }

    /// Write `column` into column `j` in place: non-zero entries are stored,
    /// zero-valued entries erase the existing value.
    pub fn set_column_mut(&mut self, j: usize, column: &SparseVector) -> Result<&mut Self> {
        LaError::check_index(j, self.ncols)?;
        if column.len() != self.nrows {
            return Err(LaError::DimensionMismatch(format!(
                "column of length {} does not fit a matrix with {} rows",
                column.len(),
                self.nrows
            )));
        }
        for (i, value) in column.iter() {
            if value != 0.0 {
                self.empty_row(i).set_unchecked(j, value);
            } else if let Some(row) = self.stored_row_mut(i) {
                row.set_unchecked(j, 0.0);
            }
        }
        Ok(self)
    }

    /// Copy of the matrix with column `j` replaced as in [`Self::set_column_mut`].
    pub fn set_column(&self, j: usize, column: &SparseVector) -> Result<Self> {
        let mut m = self.clone();
        m.set_column_mut(j, column)?;
        Ok(m)
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::new(self.ncols, self.nrows);
        for (&i, row) in &self.rows {
            for (j, value) in row.iter() {
                if value != 0.0 {
                    t.empty_row(j).set_unchecked(i, value);
                }
            }
        }
        t
    }

    pub fn transpose_mut(&mut self) -> &mut Self {
        *self = self.transpose();
        self
    }

    /// Diagonal band as a column vector of length `n - |offset|`.
    ///
    /// A positive `offset` reads below the main diagonal (`A[k + offset][k]`),
    /// a negative one above it (`A[k][k - offset]`).
    pub fn trace(&self, offset: isize) -> Result<SparseVector> {
        if !self.is_square() {
            return Err(LaError::DimensionMismatch(format!(
                "trace of a non-square {}x{} matrix",
                self.nrows, self.ncols
            )));
        }
        let shift = offset.unsigned_abs();
        if shift >= self.nrows {
            return Err(LaError::OffsetOutOfRange { offset, size: self.nrows });
        }
        let len = self.nrows - shift;
        let mut diag = SparseVector::column(len);
        for k in 0..len {
            let (i, j) = if offset > 0 { (k + shift, k) } else { (k, k + shift) };
            if let Some(value) = self.lookup(i, j) {
                diag.set_unchecked(k, value);
            }
        }
        Ok(diag)
    }

    /// Stored rows in ascending row order.
    pub fn iter(&self) -> Rows<'_> {
        Rows { inner: self.rows.iter() }
    }

    /// Mutable stored rows in ascending row order.
    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut SparseVector)> {
        self.rows.iter_mut().map(|(&i, row)| (i, row))
    }

    /// Stored rows whose index falls in `range`, ascending.
    pub(crate) fn row_range(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = (usize, &SparseVector)> {
        self.rows.range(range).map(|(&i, row)| (i, row))
    }

    pub(crate) fn stored_row(&self, i: usize) -> Option<&SparseVector> {
        self.rows.get(&i)
    }

    pub(crate) fn stored_row_mut(&mut self, i: usize) -> Option<&mut SparseVector> {
        self.rows.get_mut(&i)
    }

    pub(crate) fn lookup(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(&i).and_then(|row| row.lookup(j))
    }

    /// Caller guarantees `i < nrows`.
    pub(crate) fn empty_row(&mut self, i: usize) -> &mut SparseVector {
        let ncols = self.ncols;
        self.rows
            .entry(i)
            .or_insert_with(|| SparseVector::with_orientation(ncols, Orientation::Row))
    }

    /// Caller guarantees `i < nrows` and `row.len() == ncols`.
    pub(crate) fn insert_row(&mut self, i: usize, mut row: SparseVector) {
        if row.is_column() {
            row.transpose_mut();
        }
        self.rows.insert(i, row);
    }

    pub(crate) fn retain_rows<F: FnMut(&SparseVector) -> bool>(&mut self, mut f: F) {
        self.rows.retain(|_, row| f(row));
    }
}

impl MatShape for SparseMatrix {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

/// Logical equality: same shape and the same non-zero entries. Stored zeros
/// and empty materialized rows are ignored.
impl PartialEq for SparseMatrix {
    fn eq(&self, other: &Self) -> bool {
        fn nonzeros(m: &SparseMatrix) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
            m.iter()
                .flat_map(|(i, row)| row.iter().map(move |(j, v)| (i, j, v)))
                .filter(|&(_, _, v)| v != 0.0)
        }
        self.nrows == other.nrows && self.ncols == other.ncols && nonzeros(self).eq(nonzeros(other))
    }
}

/// Iterator over the stored rows of a [`SparseMatrix`].
#[derive(Clone)]
pub struct Rows<'a> {
    inner: btree_map::Iter<'a, usize, SparseVector>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = (usize, &'a SparseVector);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&i, row)| (i, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Rows<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(&i, row)| (i, row))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl<'a> IntoIterator for &'a SparseMatrix {
    type Item = (usize, &'a SparseVector);
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Write access to one stored row of a [`SparseMatrix`].
///
/// Reads go through `Deref`; there is no way to change the row's
/// orientation or length through the handle.
pub struct RowMut<'a> {
    row: &'a mut SparseVector,
}

impl RowMut<'_> {
    /// See [`SparseVector::get_mut`].
    pub fn get_mut(&mut self, j: usize) -> Result<&mut f64> {
        self.row.get_mut(j)
    }

    /// See [`SparseVector::set`].
    pub fn set(&mut self, j: usize, value: f64) -> Result<()> {
        self.row.set(j, value)
    }

    pub fn erase(&mut self, j: usize) -> Result<Option<f64>> {
        self.row.erase(j)
    }

    pub fn prune(&mut self) {
        self.row.prune();
    }

    pub fn clear(&mut self) {
        self.row.clear();
    }
}

impl Deref for RowMut<'_> {
    type Target = SparseVector;

    fn deref(&self) -> &SparseVector {
        &*self.row
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nonzeros = self.iter().flat_map(|(i, row)| row.iter().map(move |(j, v)| (i, j, v)));
        let count = nonzeros.clone().filter(|&(_, _, v)| v != 0.0).count();
        writeln!(f, "SparseMatrix ({}x{}, {} stored):", self.nrows, self.ncols, count)?;
        for (i, j, v) in nonzeros.filter(|&(_, _, v)| v != 0.0) {
            writeln!(f, "  ({}, {}): {}", i, j, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag3() -> SparseMatrix {
        SparseMatrix::from_triplets(3, 3, [(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0)]).unwrap()
    }

    #[test]
    fn column_synthesis() {
        let m = diag3();
        let c = m.column(1).unwrap();
        assert!(c.is_column());
        assert_eq!(c.len(), 3);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(1, 2.0)]);
        assert!(matches!(m.column(3), Err(LaError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn absent_row_read_does_not_materialize() {
        let m = SparseMatrix::new(4, 2);
        let row = m.row(3).unwrap();
        assert!(row.is_row());
        assert_eq!(row.len(), 2);
        assert_eq!(m.iter().count(), 0);
        assert!(m.row(4).is_err());
    }

    #[test]
    fn row_mut_materializes() {
        let mut m = SparseMatrix::new(2, 3);
        m.row_mut(1).unwrap().set(2, 4.0).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 4.0);
        assert_eq!(m.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);
        assert!(m.get_mut(0, 3).is_err());
    }

    #[test]
    fn set_column_writes_and_erases() {
        let mut m = diag3();
        let mut col = SparseVector::column(3);
        col.set(0, 5.0).unwrap();
        *col.get_mut(1).unwrap() = 0.0;
        let copy = m.set_column(1, &col).unwrap();
        assert_eq!(copy.get(0, 1).unwrap(), 5.0);
        assert_eq!(copy.get(1, 1).unwrap(), 0.0);
        assert_eq!(m.get(1, 1).unwrap(), 2.0);

        m.set_column_mut(1, &col).unwrap();
        assert_eq!(m, copy);
        assert!(m.set_column_mut(0, &SparseVector::column(2)).is_err());
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let m = SparseMatrix::from_triplets(2, 3, [(0, 2, 1.5), (1, 0, -2.0)]).unwrap();
        let t = m.transpose();
        assert_eq!((t.nrows(), t.ncols()), (3, 2));
        assert_eq!(t.get(2, 0).unwrap(), 1.5);
        assert_eq!(t.get(0, 1).unwrap(), -2.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn trace_offsets() {
        let m = SparseMatrix::from_triplets(3, 3, [(0, 0, 1.0), (1, 0, 4.0), (2, 1, 5.0), (0, 2, 9.0)])
            .unwrap();
        let main = m.trace(0).unwrap();
        assert_eq!(main.iter().collect::<Vec<_>>(), vec![(0, 1.0)]);
        let below = m.trace(1).unwrap();
        assert_eq!(below.len(), 2);
        assert_eq!(below.iter().collect::<Vec<_>>(), vec![(0, 4.0), (1, 5.0)]);
        let above = m.trace(-2).unwrap();
        assert_eq!(above.iter().collect::<Vec<_>>(), vec![(0, 9.0)]);
        assert!(matches!(m.trace(3), Err(LaError::OffsetOutOfRange { offset: 3, size: 3 })));
        assert!(matches!(SparseMatrix::new(2, 3).trace(0), Err(LaError::DimensionMismatch(_))));
    }

    #[test]
    fn identity_and_display() {
        let id = SparseMatrix::identity(2);
        assert_eq!(id.nnz(), 2);
        let s = format!("{}", id);
        assert!(s.starts_with("SparseMatrix (2x2, 2 stored)"));
        assert!(s.contains("(1, 1): 1"));
    }

    #[test]
    fn row_handle_keeps_row_orientation() {
        let mut m = SparseMatrix::new(2, 3);
        {
            let mut row = m.row_mut(0).unwrap();
            row.set(1, 2.0).unwrap();
            *row.get_mut(2).unwrap() = 5.0;
            assert!(row.is_row());
            assert_eq!(row.len(), 3);
            row.clear();
        }
        assert!(m.row(0).unwrap().is_row());
        assert!(m.iter().all(|(_, r)| r.is_row() && r.len() == 3));
        m.row_mut(1).unwrap().set(0, 1.0).unwrap();
        assert_eq!(m.row(1).unwrap().orientation(), Orientation::Row);
        assert_eq!(m.row_mut(1).unwrap().erase(0).unwrap(), Some(1.0));
    }

    #[test]
    fn display_skips_stored_zeros() {
        let mut m = SparseMatrix::identity(2);
        *m.get_mut(0, 1).unwrap() = 0.0;
        assert_eq!(m.nnz(), 3);
        let s = format!("{}", m);
        assert!(s.starts_with("SparseMatrix (2x2, 2 stored):"));
        assert!(!s.contains("(0, 1)"));
        assert_eq!(s.lines().count(), 3);
    }

    #[test]
    fn equality_ignores_empty_rows() {
        let mut a = diag3();
        let b = diag3();
        *a.get_mut(0, 1).unwrap() = 0.0;
        let mut c = SparseMatrix::new(3, 3);
        c.row_mut(2).unwrap();
        assert_eq!(a, b);
        assert_eq!(c, SparseMatrix::new(3, 3));
    }
}
