//! Vector arithmetic: dot product, sum, difference and scalar scaling.
//!
//! Every binary operation checks lengths before touching any data. Sums and
//! differences start from a copy of the left operand and drop an entry as
//! soon as it cancels to exactly zero. Orientation is not checked: a row may
//! be dotted with or added to a column, and results keep the left operand's
//! orientation.

use std::ops::{Div, Mul, Neg};

use crate::error::{LaError, Result};
use crate::matrix::sparse_vector::SparseVector;

pub(crate) fn check_same_len(u: &SparseVector, v: &SparseVector, op: &str) -> Result<()> {
    if u.len() != v.len() {
        return Err(LaError::DimensionMismatch(format!(
            "{}: vectors of length {} and {}",
            op,
            u.len(),
            v.len()
        )));
    }
    Ok(())
}

/// Dot product `u · v`, iterating the operand with fewer stored entries.
pub fn dot(u: &SparseVector, v: &SparseVector) -> Result<f64> {
    check_same_len(u, v, "dot product")?;
    Ok(dot_unchecked(u, v))
}

/// Caller guarantees equal lengths.
pub(crate) fn dot_unchecked(u: &SparseVector, v: &SparseVector) -> f64 {
    let (small, large) = if u.nnz() <= v.nnz() { (u, v) } else { (v, u) };
    let mut sum = 0.0;
    for (i, a) in small.iter() {
        if let Some(b) = large.lookup(i) {
            sum += a * b;
        }
    }
    sum
}

/// `u + v`.
pub fn add(u: &SparseVector, v: &SparseVector) -> Result<SparseVector> {
    check_same_len(u, v, "vector sum")?;
    let mut sum = u.clone();
    accumulate(&mut sum, v, 1.0);
    Ok(sum)
}

/// `u - v`.
pub fn sub(u: &SparseVector, v: &SparseVector) -> Result<SparseVector> {
    check_same_len(u, v, "vector difference")?;
    let mut diff = u.clone();
    accumulate(&mut diff, v, -1.0);
    Ok(diff)
}

/// `target += sign * v`, pruning exact cancellations. Lengths must match.
pub(crate) fn accumulate(target: &mut SparseVector, v: &SparseVector, sign: f64) {
    for (i, b) in v.iter() {
        let slot = target.entry_unchecked(i);
        *slot += sign * b;
        if *slot == 0.0 {
            target.set_unchecked(i, 0.0);
        }
    }
}

/// `u * m`. Entries that become zero (`m == 0`) are dropped.
pub fn scale(u: &SparseVector, m: f64) -> SparseVector {
    let mut out = u.clone();
    scale_in_place(&mut out, m);
    out
}

/// `u / m`.
pub fn divide(u: &SparseVector, m: f64) -> SparseVector {
    let mut out = u.clone();
    for value in out.values_mut() {
        *value /= m;
    }
    out.prune();
    out
}

pub(crate) fn scale_in_place(u: &mut SparseVector, m: f64) {
    for value in u.values_mut() {
        *value *= m;
    }
    u.prune();
}

impl Mul<f64> for &SparseVector {
    type Output = SparseVector;

    fn mul(self, m: f64) -> SparseVector {
        scale(self, m)
    }
}

impl Mul<f64> for SparseVector {
    type Output = SparseVector;

    fn mul(mut self, m: f64) -> SparseVector {
        scale_in_place(&mut self, m);
        self
    }
}

impl Mul<&SparseVector> for f64 {
    type Output = SparseVector;

    fn mul(self, u: &SparseVector) -> SparseVector {
        scale(u, self)
    }
}

impl Mul<SparseVector> for f64 {
    type Output = SparseVector;

    fn mul(self, u: SparseVector) -> SparseVector {
        u * self
    }
}

impl Div<f64> for &SparseVector {
    type Output = SparseVector;

    fn div(self, m: f64) -> SparseVector {
        divide(self, m)
    }
}

impl Div<f64> for SparseVector {
    type Output = SparseVector;

    fn div(self, m: f64) -> SparseVector {
        divide(&self, m)
    }
}

impl Neg for &SparseVector {
    type Output = SparseVector;

    fn neg(self) -> SparseVector {
        scale(self, -1.0)
    }
}

impl Neg for SparseVector {
    type Output = SparseVector;

    fn neg(self) -> SparseVector {
        self * -1.0
    }
}
