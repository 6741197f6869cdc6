//! Typed errors for loading, aligning and comparing the Geneva 10 datasets.
//!
//! Loading errors abort a run. Per-sample validity failures are never errors;
//! they are counted by the filter instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the comparison library.
#[derive(Debug, Error)]
pub enum CompareError {
    /// A required input file does not exist.
    #[error("required input not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// Schema mismatch: missing or renamed column, unparsable cell, wrong row count.
    #[error("malformed data in {source_name}: {detail}")]
    MalformedData { source_name: String, detail: String },

    /// An operation that needs at least one sample received none.
    #[error("{what} has no samples")]
    EmptySeries { what: String },

    /// Two spatial profiles do not share a radius grid.
    #[error("radius grid mismatch: baseline has {baseline} zones, comparison has {other}")]
    GridMismatch { baseline: usize, other: usize },

    /// Percent change requested against a zero baseline value.
    #[error("percent change undefined at radius index {index}: baseline value is zero")]
    DivisionByZero { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompareError {
    pub(crate) fn malformed(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedData {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn empty(what: impl Into<String>) -> Self {
        Self::EmptySeries { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_resource_not_found_names_path() {
        let err = CompareError::ResourceNotFound {
            path: PathBuf::from("output_time_series.csv"),
        };
        assert_eq!(
            err.to_string(),
            "required input not found: output_time_series.csv"
        );
    }

    #[test]
    fn display_grid_mismatch() {
        let err = CompareError::GridMismatch {
            baseline: 10,
            other: 9,
        };
        assert!(err.to_string().contains("10 zones"));
        assert!(err.to_string().contains("9"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CompareError = io.into();
        assert!(matches!(err, CompareError::Io(_)));
    }
}
