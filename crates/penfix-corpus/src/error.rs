//! Error types for penfix-corpus.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading or writing corpus files.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A split ratio outside `[0, 1]`.
    #[error("invalid test ratio {0}, expected a value in [0, 1]")]
    InvalidRatio(f64),
}
