//! Whitespace-delimited text format for sparse vectors and matrices.
//!
//! ```text
//! # comment
//! # comment
//! # comment
//! <rows> <cols>
//! <v> <v> ... <v>      (one dense line per row)
//! ```
//!
//! A vector has a single `<len>` on the dimension line followed by one line
//! of `len` values. Lines starting with `#` and blank lines are skipped when
//! reading, and zero values are not stored. Writing expands implicit zeros so
//! every row is dense.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::config::options::TextFormatOptions;
use crate::error::{LaError, Result};
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::SparseVector;

/// Data tokens of the input, comments and blank lines removed.
struct Tokens {
    tokens: std::vec::IntoIter<(usize, String)>,
}

impl Tokens {
    fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut tokens = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            tokens.extend(trimmed.split_whitespace().map(|t| (n + 1, t.to_string())));
        }
        Ok(Self { tokens: tokens.into_iter() })
    }

    fn parse_next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let (line, token) = self
            .tokens
            .next()
            .ok_or_else(|| LaError::Parse(format!("unexpected end of input while reading {}", what)))?;
        token
            .parse()
            .map_err(|_| LaError::Parse(format!("line {}: invalid {} '{}'", line, what, token)))
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            Some((line, token)) => Err(LaError::Parse(format!("line {}: unexpected trailing value '{}'", line, token))),
            None => Ok(()),
        }
    }
}

/// Read a matrix in the text format; zero values are skipped.
pub fn read_matrix<R: BufRead>(reader: R) -> Result<SparseMatrix> {
    let mut tokens = Tokens::read(reader)?;
    let nrows: usize = tokens.parse_next("row count")?;
    let ncols: usize = tokens.parse_next("column count")?;
    let mut m = SparseMatrix::new(nrows, ncols);
    for i in 0..nrows {
        for j in 0..ncols {
            let value: f64 = tokens.parse_next("matrix value")?;
            if value != 0.0 {
                m.empty_row(i).set_unchecked(j, value);
            }
        }
    }
    tokens.finish()?;
    debug!(nrows, ncols, nnz = m.nnz(), "read sparse matrix");
    Ok(m)
}

/// Read a column vector in the text format; zero values are skipped.
pub fn read_vector<R: BufRead>(reader: R) -> Result<SparseVector> {
    let mut tokens = Tokens::read(reader)?;
    let len: usize = tokens.parse_next("vector length")?;
    let mut v = SparseVector::column(len);
    for i in 0..len {
        let value: f64 = tokens.parse_next("vector value")?;
        v.set_unchecked(i, value);
    }
    tokens.finish()?;
    debug!(len, nnz = v.nnz(), "read sparse vector");
    Ok(v)
}

pub fn read_matrix_file<P: AsRef<Path>>(path: P) -> Result<SparseMatrix> {
    read_matrix(BufReader::new(File::open(path)?))
}

pub fn read_vector_file<P: AsRef<Path>>(path: P) -> Result<SparseVector> {
    read_vector(BufReader::new(File::open(path)?))
}

fn write_header<W: Write>(w: &mut W, options: &TextFormatOptions, title: &str) -> Result<()> {
    for line in options.header_lines(title) {
        if line.is_empty() {
            writeln!(w, "#")?;
        } else {
            writeln!(w, "# {}", line)?;
        }
    }
    Ok(())
}

fn write_dense_line<W: Write>(w: &mut W, options: &TextFormatOptions, v: &SparseVector) -> Result<()> {
    let line: Vec<String> = v.to_dense().into_iter().map(|x| options.format_value(x)).collect();
    writeln!(w, "{}", line.join(" "))?;
    Ok(())
}

/// Write `m` with every row expanded to `ncols` values.
pub fn write_matrix<W: Write>(m: &SparseMatrix, mut w: W, options: &TextFormatOptions) -> Result<()> {
    write_header(&mut w, options, "Sparse matrix")?;
    writeln!(w, "{} {}", m.nrows(), m.ncols())?;
    let empty = SparseVector::row(m.ncols());
    for i in 0..m.nrows() {
        write_dense_line(&mut w, options, m.stored_row(i).unwrap_or(&empty))?;
    }
    w.flush()?;
    debug!(nrows = m.nrows(), ncols = m.ncols(), "wrote sparse matrix");
    Ok(())
}

/// Write `v` as a dimension line and one dense line of values.
pub fn write_vector<W: Write>(v: &SparseVector, mut w: W, options: &TextFormatOptions) -> Result<()> {
    write_header(&mut w, options, "Sparse vector")?;
    writeln!(w, "{}", v.len())?;
    write_dense_line(&mut w, options, v)?;
    w.flush()?;
    debug!(len = v.len(), "wrote sparse vector");
    Ok(())
}

pub fn write_matrix_file<P: AsRef<Path>>(m: &SparseMatrix, path: P, options: &TextFormatOptions) -> Result<()> {
    write_matrix(m, BufWriter::new(File::create(path)?), options)
}

pub fn write_vector_file<P: AsRef<Path>>(v: &SparseVector, path: P, options: &TextFormatOptions) -> Result<()> {
    write_vector(v, BufWriter::new(File::create(path)?), options)
}
