//! Row-partitioned parallel products.
//!
//! The output rows are split into contiguous blocks, one per worker. Every
//! worker reads the shared inputs and returns the rows of its own block; the
//! caller then assembles the blocks into the result. No output row is ever
//! written by more than one worker, so nothing is locked.
//!
//! With the `rayon` feature the blocks run on a dedicated thread pool. Without
//! it the same blocks run one after another on the calling thread.

use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::algebra::product::{check_mat_mat, check_mat_vec};
use crate::algebra::vector::dot_unchecked;
use crate::config::options::ParallelOptions;
use crate::error::Result;
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::SparseVector;

/// Split `rows` into `threads` contiguous blocks of near-equal size.
///
/// The first `rows % threads` blocks get one extra row. Empty blocks (more
/// threads than rows) are left out.
pub fn partition_rows(rows: usize, threads: usize) -> Vec<Range<usize>> {
    let threads = threads.max(1);
    let base = rows / threads;
    let extra = rows % threads;
    let mut blocks = Vec::with_capacity(threads);
    let mut start = 0;
    for t in 0..threads {
        let size = base + usize::from(t < extra);
        if size == 0 {
            break;
        }
        blocks.push(start..start + size);
        start += size;
    }
    blocks
}

/// Matrix-vector and matrix-matrix products spread over a worker pool.
#[derive(Debug)]
pub struct ParallelProduct {
    #[cfg(feature = "rayon")]
    pool: rayon::ThreadPool,
    threads: usize,
}

impl ParallelProduct {
    /// Pool sized to the hardware concurrency (at least two workers).
    pub fn new() -> Result<Self> {
        Self::with_options(&ParallelOptions::default())
    }

    pub fn with_options(options: &ParallelOptions) -> Result<Self> {
        let threads = options.resolved_threads();
        #[cfg(feature = "rayon")]
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        debug!(threads, "parallel product pool ready");
        Ok(Self {
            #[cfg(feature = "rayon")]
            pool,
            threads,
        })
    }

    pub fn num_threads(&self) -> usize {
        self.threads
    }

    /// Run `work` once per block; results come back in block order.
    fn run_blocks<T, F>(&self, rows: usize, work: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Range<usize>) -> T + Sync + Send,
    {
        let blocks = partition_rows(rows, self.threads);
        debug!(rows, blocks = blocks.len(), "partitioned rows");
        #[cfg(feature = "rayon")]
        {
            self.pool
                .install(|| blocks.into_par_iter().map(&work).collect())
        }
        #[cfg(not(feature = "rayon"))]
        {
            blocks.into_iter().map(work).collect()
        }
    }

    /// `A * u`, same contract as [`crate::algebra::mat_vec`].
    pub fn mat_vec(&self, a: &SparseMatrix, u: &SparseVector) -> Result<SparseVector> {
        check_mat_vec(a, u)?;
        let blocks = self.run_blocks(a.nrows(), |range| {
            trace!(start = range.start, end = range.end, "mat_vec block");
            a.row_range(range)
                .map(|(i, row)| (i, dot_unchecked(row, u)))
                .filter(|&(_, value)| value != 0.0)
                .collect::<Vec<_>>()
        });
        let mut p = SparseVector::column(a.nrows());
        for (i, value) in blocks.into_iter().flatten() {
            p.set_unchecked(i, value);
        }
        Ok(p)
    }

    /// `A * B`, same contract as [`crate::algebra::mat_mat`].
    ///
    /// `B` is transposed once up front so every worker reads the columns of
    /// `B` as stored rows. Each entry goes through the same dot product as
    /// the serial path, so the two results agree exactly.
    pub fn mat_mat(&self, a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
        check_mat_mat(a, b)?;
        let bt = b.transpose();
        let width = b.ncols();
        let blocks = self.run_blocks(a.nrows(), |range| {
            trace!(start = range.start, end = range.end, "mat_mat block");
            let mut out = Vec::new();
            for (i, row) in a.row_range(range) {
                let mut product = SparseVector::row(width);
                for (j, column) in bt.iter() {
                    product.set_unchecked(j, dot_unchecked(row, column));
                }
                if product.nnz() > 0 {
                    out.push((i, product));
                }
            }
            out
        });
        let mut p = SparseMatrix::new(a.nrows(), width);
        for (i, row) in blocks.into_iter().flatten() {
            p.insert_row(i, row);
        }
        Ok(p)
    }
}

/// Parallel `A * u` on a freshly built default pool.
pub fn parallel_mat_vec(a: &SparseMatrix, u: &SparseVector) -> Result<SparseVector> {
    ParallelProduct::new()?.mat_vec(a, u)
}

/// Parallel `A * B` on a freshly built default pool.
pub fn parallel_mat_mat(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    ParallelProduct::new()?.mat_mat(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::product::{mat_mat, mat_vec};
    use crate::error::LaError;
    use crate::matrix::sparse_vector::Orientation;

    #[test]
    fn partition_gives_extra_rows_first() {
        assert_eq!(partition_rows(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
        assert_eq!(partition_rows(4, 2), vec![0..2, 2..4]);
        assert_eq!(partition_rows(2, 4), vec![0..1, 1..2]);
        assert!(partition_rows(0, 3).is_empty());
    }

    #[test]
    fn partition_covers_every_row_once() {
        for rows in 0..20 {
            for threads in 1..6 {
                let blocks = partition_rows(rows, threads);
                let covered: Vec<usize> = blocks.iter().flat_map(|b| b.clone()).collect();
                assert_eq!(covered, (0..rows).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn matches_serial_products() {
        let a = SparseMatrix::from_triplets(
            5,
            3,
            [(0, 0, 1.0), (1, 2, -2.0), (2, 1, 4.0), (4, 0, 3.0), (4, 2, 0.5)],
        )
        .unwrap();
        let b = a.transpose();
        let engine = ParallelProduct::with_options(&ParallelOptions::with_threads(3)).unwrap();
        assert_eq!(engine.num_threads(), 3);
        assert_eq!(engine.mat_mat(&a, &b).unwrap(), mat_mat(&a, &b).unwrap());

        let u = SparseVector::from_dense(&[1.0, 2.0, 3.0], Orientation::Column);
        assert_eq!(engine.mat_vec(&a, &u).unwrap(), mat_vec(&a, &u).unwrap());
    }

    #[test]
    fn validates_like_serial() {
        let a = SparseMatrix::new(3, 2);
        assert!(matches!(parallel_mat_mat(&a, &a), Err(LaError::DimensionMismatch(_))));
        assert!(matches!(
            parallel_mat_vec(&a, &SparseVector::row(2)),
            Err(LaError::InvalidArgument(_))
        ));
    }
}
