//! API options for the parallel product and the text format.
//!
//! This module provides `ParallelOptions`, which controls how many worker
//! threads the parallel matrix products use, and `TextFormatOptions`, which
//! controls how sparse vectors and matrices are rendered by the `io` module.

/// Worker-pool sizing for the parallel products.
#[derive(Debug, Clone, Default)]
pub struct ParallelOptions {
    /// Number of worker threads; `None` uses the hardware concurrency.
    pub num_threads: Option<usize>,
}

/// Lower bound on the worker count, whatever the hardware reports.
pub const MIN_THREADS: usize = 2;

impl ParallelOptions {
    pub fn with_threads(num_threads: usize) -> Self {
        Self { num_threads: Some(num_threads) }
    }

    /// Resolved worker count, never below [`MIN_THREADS`].
    pub fn resolved_threads(&self) -> usize {
        let requested = match self.num_threads {
            Some(n) => n,
            #[cfg(feature = "rayon")]
            None => num_cpus::get(),
            #[cfg(not(feature = "rayon"))]
            None => MIN_THREADS,
        };
        requested.max(MIN_THREADS)
    }
}

/// Number of `#` comment lines that precede the dimensions in the text format.
pub const HEADER_LINES: usize = 3;

/// Rendering options for the whitespace-delimited text format.
#[derive(Debug, Clone, Default)]
pub struct TextFormatOptions {
    /// Comment lines written before the dimensions (padded to [`HEADER_LINES`]).
    pub header: Vec<String>,

    /// Decimals per value; `None` writes the shortest round-trippable form.
    pub precision: Option<usize>,
}

impl TextFormatOptions {
    pub(crate) fn header_lines(&self, title: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(HEADER_LINES.max(self.header.len()));
        if self.header.is_empty() {
            lines.push(title.to_string());
        } else {
            lines.extend(self.header.iter().cloned());
        }
        while lines.len() < HEADER_LINES {
            lines.push(String::new());
        }
        lines
    }

    pub(crate) fn format_value(&self, value: f64) -> String {
        match self.precision {
            Some(p) => format!("{:.*}", p, value),
            None => format!("{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_threads_has_floor() {
        assert_eq!(ParallelOptions::with_threads(1).resolved_threads(), MIN_THREADS);
        assert_eq!(ParallelOptions::with_threads(7).resolved_threads(), 7);
        assert!(ParallelOptions::default().resolved_threads() >= MIN_THREADS);
    }

    #[test]
    fn header_is_padded() {
        let opts = TextFormatOptions::default();
        let lines = opts.header_lines("Written matrix");
        assert_eq!(lines, vec!["Written matrix".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn precision_controls_decimals() {
        let opts = TextFormatOptions { precision: Some(3), ..Default::default() };
        assert_eq!(opts.format_value(1.0 / 3.0), "0.333");
        assert_eq!(TextFormatOptions::default().format_value(0.5), "0.5");
    }
}
