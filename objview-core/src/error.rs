//! Error types for model loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for model loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading and normalizing a model.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The model file could not be opened or read.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A `v`, `vn` or `f` record did not have the expected fields.
    #[error("malformed record at line {line}: {message}")]
    Malformed {
        /// 1-based line number of the record.
        line: usize,
        /// Description of what was wrong.
        message: String,
    },

    /// A face referenced a position that does not exist.
    #[error("face at line {line} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        /// 1-based line number of the face.
        line: usize,
        /// 1-based index as written in the file.
        index: u32,
        /// Number of positions in the file.
        vertex_count: usize,
    },

    /// The positions span no volume along any axis, so they cannot be normalized.
    #[error("degenerate geometry: largest axis span is {span}")]
    Degenerate {
        /// Largest axis span found (zero, or non-finite).
        span: f32,
    },
}

impl LoadError {
    /// Create a `Malformed` error for the given line.
    #[must_use]
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}
