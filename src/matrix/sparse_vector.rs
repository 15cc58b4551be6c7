//! Coordinate-map sparse vector.
//!
//! A `SparseVector` stores only its non-zero entries in an ordered map from
//! index to value, together with its logical length and whether it is a row
//! or a column vector. The orientation is a runtime flag rather than a type
//! parameter so that rows and columns share all of the arithmetic code.
//!
//! Reads never mutate: [`SparseVector::get`] returns `0.0` for an absent entry
//! without inserting it. Writes go through [`SparseVector::get_mut`], which may
//! insert a zero entry, or [`SparseVector::set`], which removes the entry when
//! the new value is exactly zero.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LaError, Result};

/// Whether a vector is a row (1×n) or a column (n×1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    Row,
    #[default]
    Column,
}

impl Orientation {
    /// The opposite orientation.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Row => Orientation::Column,
            Orientation::Column => Orientation::Row,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Row => f.write_str("row"),
            Orientation::Column => f.write_str("column"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    len: usize,
    orientation: Orientation,
    entries: BTreeMap<usize, f64>,
}

impl SparseVector {
    /// Empty column vector of the given length.
    pub fn new(len: usize) -> Self {
        Self::with_orientation(len, Orientation::Column)
    }

    pub fn with_orientation(len: usize, orientation: Orientation) -> Self {
        Self { len, orientation, entries: BTreeMap::new() }
    }

    /// Empty row vector of the given length.
    pub fn row(len: usize) -> Self {
        Self::with_orientation(len, Orientation::Row)
    }

    /// Empty column vector of the given length.
    pub fn column(len: usize) -> Self {
        Self::with_orientation(len, Orientation::Column)
    }

    /// Build from `(index, value)` pairs; zero values are skipped and later
    /// duplicates overwrite earlier ones.
    pub fn from_entries<I>(len: usize, orientation: Orientation, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut v = Self::with_orientation(len, orientation);
        for (i, value) in entries {
            v.set(i, value)?;
        }
        Ok(v)
    }

    /// Logical length (including implicit zeros).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_column(&self) -> bool {
        self.orientation == Orientation::Column
    }

    pub fn is_row(&self) -> bool {
        self.orientation == Orientation::Row
    }

    /// Value at `i`, `0.0` when absent. Never inserts.
    pub fn get(&self, i: usize) -> Result<f64> {
        LaError::check_index(i, self.len)?;
        Ok(self.entries.get(&i).copied().unwrap_or(0.0))
    }

    /// Mutable reference to the entry at `i`, inserting `0.0` if absent.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut f64> {
        LaError::check_index(i, self.len)?;
        Ok(self.entries.entry(i).or_insert(0.0))
    }

    /// Set the entry at `i`; a value of exactly zero removes it.
    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        LaError::check_index(i, self.len)?;
        self.set_unchecked(i, value);
        Ok(())
    }

    /// Remove the entry at `i`, returning its stored value.
    pub fn erase(&mut self, i: usize) -> Result<Option<f64>> {
        LaError::check_index(i, self.len)?;
        Ok(self.entries.remove(&i))
    }

    /// Drop every stored zero.
    pub fn prune(&mut self) {
        self.entries.retain(|_, v| *v != 0.0);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copy with the orientation flipped; the entries are unchanged.
    pub fn transpose(&self) -> Self {
        Self {
            len: self.len,
            orientation: self.orientation.flipped(),
            entries: self.entries.clone(),
        }
    }

    /// Flip the orientation in place.
    pub fn transpose_mut(&mut self) -> &mut Self {
        self.orientation = self.orientation.flipped();
        self
    }

    /// Euclidean norm of the stored entries.
    pub fn norm(&self) -> f64 {
        self.entries.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Stored `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> Entries<'_> {
        Entries { inner: self.entries.iter() }
    }

    /// Stored entries whose index falls in `range`, ascending.
    pub(crate) fn range(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.range(range).map(|(&i, &v)| (i, v))
    }

    pub(crate) fn lookup(&self, i: usize) -> Option<f64> {
        self.entries.get(&i).copied()
    }

    /// Caller guarantees `i < len`.
    pub(crate) fn set_unchecked(&mut self, i: usize, value: f64) {
        if value == 0.0 {
            self.entries.remove(&i);
        } else {
            self.entries.insert(i, value);
        }
    }

    /// Caller guarantees `i < len`.
    pub(crate) fn entry_unchecked(&mut self, i: usize) -> &mut f64 {
        self.entries.entry(i).or_insert(0.0)
    }

    pub(crate) fn retain<F: FnMut(usize, &mut f64) -> bool>(&mut self, mut f: F) {
        self.entries.retain(|&i, v| f(i, v));
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.entries.values_mut()
    }
}

/// Logical equality: same length, orientation and non-zero entries.
/// Stored zeros are ignored.
impl PartialEq for SparseVector {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.orientation == other.orientation
            && self.iter().filter(|&(_, v)| v != 0.0).eq(other.iter().filter(|&(_, v)| v != 0.0))
    }
}

/// Iterator over the stored entries of a [`SparseVector`].
#[derive(Clone)]
pub struct Entries<'a> {
    inner: btree_map::Iter<'a, usize, f64>,
}

impl Iterator for Entries<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&i, &v)| (i, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(&i, &v)| (i, v))
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl<'a> IntoIterator for &'a SparseVector {
    type Item = (usize, f64);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.iter().filter(|&(_, v)| v != 0.0).count();
        writeln!(f, "SparseVector ({}, length {}, {} stored):", self.orientation, self.len, count)?;
        for (i, v) in self.iter().filter(|&(_, v)| v != 0.0) {
            writeln!(f, "  ({}): {}", i, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_does_not_insert() {
        let v = SparseVector::new(5);
        assert_eq!(v.get(4).unwrap(), 0.0);
        assert_eq!(v.nnz(), 0);
        assert!(matches!(v.get(5), Err(LaError::IndexOutOfBounds { index: 5, len: 5 })));
    }

    #[test]
    fn get_mut_inserts_zero() {
        let mut v = SparseVector::new(3);
        *v.get_mut(1).unwrap() += 2.5;
        assert_eq!(v.get(1).unwrap(), 2.5);
        let _ = v.get_mut(2).unwrap();
        assert_eq!(v.nnz(), 2);
        v.prune();
        assert_eq!(v.nnz(), 1);
    }

    #[test]
    fn set_zero_removes_entry() {
        let mut v = SparseVector::new(4);
        v.set(2, 3.0).unwrap();
        assert_eq!(v.nnz(), 1);
        v.set(2, 0.0).unwrap();
        assert_eq!(v.nnz(), 0);
        assert!(v.set(4, 1.0).is_err());
    }

    #[test]
    fn transpose_flips_orientation_only() {
        let v = SparseVector::from_entries(3, Orientation::Column, [(0, 1.0), (2, -1.0)]).unwrap();
        let t = v.transpose();
        assert!(t.is_row());
        assert_eq!(t.iter().collect::<Vec<_>>(), v.iter().collect::<Vec<_>>());
        let mut u = t.clone();
        u.transpose_mut();
        assert_eq!(u, v);
    }

    #[test]
    fn iteration_is_ascending_and_restartable() {
        let v = SparseVector::from_entries(10, Orientation::Row, [(7, 1.0), (1, 2.0), (4, 0.0), (3, 3.0)])
            .unwrap();
        let first: Vec<_> = v.iter().collect();
        assert_eq!(first, vec![(1, 2.0), (3, 3.0), (7, 1.0)]);
        let second: Vec<_> = (&v).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(v.iter().rev().next(), Some((7, 1.0)));
    }

    #[test]
    fn equality_ignores_stored_zeros() {
        let a = SparseVector::from_entries(3, Orientation::Column, [(1, 2.0)]).unwrap();
        let mut b = a.clone();
        *b.get_mut(0).unwrap() = 0.0;
        assert_eq!(a, b);
        assert_ne!(a, a.transpose());
    }

    #[test]
    fn display_lists_entries() {
        let v = SparseVector::from_entries(3, Orientation::Column, [(1, 2.0)]).unwrap();
        let s = format!("{}", v);
        assert!(s.starts_with("SparseVector (column, length 3, 1 stored)"));
        assert!(s.contains("(1): 2"));
    }

    #[test]
    fn display_skips_stored_zeros() {
        let mut v = SparseVector::from_entries(4, Orientation::Row, [(3, 1.5)]).unwrap();
        *v.get_mut(0).unwrap() = 0.0;
        let s = format!("{}", v);
        assert!(s.starts_with("SparseVector (row, length 4, 1 stored):"));
        assert!(!s.contains("(0)"));
        assert!(s.contains("(3): 1.5"));
    }
}
