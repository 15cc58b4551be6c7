//! Tests for the whitespace-delimited text format, through files on disk.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use rand::Rng;
use sparsela::io::{read_matrix_file, read_vector_file, write_matrix_file, write_vector_file};
use sparsela::{LaError, SparseMatrix, SparseVector, TextFormatOptions};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sparsela-{}-{}", std::process::id(), name))
}

#[test]
fn matrix_file_round_trip() {
    let mut rng = rand::thread_rng();
    let mut a = SparseMatrix::new(6, 5);
    for _ in 0..8 {
        a.set(rng.gen_range(0..6), rng.gen_range(0..5), rng.gen_range(-10.0..10.0))
            .unwrap();
    }
    let path = scratch_path("matrix.txt");
    write_matrix_file(&a, &path, &TextFormatOptions::default()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3 + 1 + 6);
    assert!(lines[..3].iter().all(|l| l.starts_with('#')));
    assert_eq!(lines[3], "6 5");
    assert!(lines[4..].iter().all(|l| l.split_whitespace().count() == 5));

    let back = read_matrix_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back, a);
}

#[test]
fn vector_file_with_precision() {
    let v = SparseVector::from_dense(&[0.0, 1.0 / 3.0, 0.0, 2.0], sparsela::Orientation::Column);
    let options = TextFormatOptions {
        header: vec!["first".into(), "second".into(), "third".into()],
        precision: Some(6),
    };
    let path = scratch_path("vector.txt");
    write_vector_file(&v, &path, &options).unwrap();
    let back = read_vector_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back.nnz(), 2);
    assert_abs_diff_eq!(back.get(1).unwrap(), 1.0 / 3.0, epsilon = 1e-6);
    assert_eq!(back.get(3).unwrap(), 2.0);
}

#[test]
fn missing_file() {
    let path = scratch_path("does-not-exist.txt");
    assert!(matches!(read_vector_file(&path), Err(LaError::Io(_))));
}
