//! Solver outcome reporting.

/// Stats returned by every [`LinearSolver`](crate::solver::LinearSolver).
#[derive(Clone, Debug, PartialEq)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub converged: bool,
}
