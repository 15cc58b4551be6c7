pub mod convergence;
pub use convergence::SolveStats;
