use thiserror::Error;

// Unified error type for sparsela

pub type Result<T> = std::result::Result<T, LaError>;

#[derive(Error, Debug)]
pub enum LaError {
    #[error("index {index} out of range for dimension {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("offset {offset} out of range for a {size}x{size} matrix")]
    OffsetOutOfRange { offset: isize, size: usize },
    #[error("matrix is not positive definite (pivot {value} at row {row})")]
    NotPositiveDefinite { row: usize, value: f64 },
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[cfg(feature = "rayon")]
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl LaError {
    pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(LaError::IndexOutOfBounds { index, len });
        }
        Ok(())
    }
}
