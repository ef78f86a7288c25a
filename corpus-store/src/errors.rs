//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for corpus loading and ranking.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A corpus entry's embedding does not have the query's dimensionality.
    #[error("dimension mismatch at corpus entry {index}: query has {expected}, entry has {got}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Entries of one corpus disagree on embedding dimensionality.
    #[error("inconsistent corpus: entry {index} has dimension {got}, expected {expected}")]
    InconsistentCorpus {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// An entry has an empty embedding.
    #[error("corpus entry {index} has an empty embedding")]
    EmptyEmbedding { index: usize },

    /// An entry's embedding contains NaN or infinity.
    #[error("corpus entry {index} has a non-finite embedding component")]
    NonFinite { index: usize },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e.to_string())
    }
}
