//! The loaded, read-only handbook corpus.

use std::path::Path;

use tracing::info;

use crate::errors::StoreError;
use crate::io_json;
use crate::record::{CorpusEntry, RankedCandidate};
use crate::retrieve;

/// Immutable collection of passages sharing one embedding dimensionality.
///
/// Load once at startup and share behind an `Arc`; nothing mutates it after
/// construction, so concurrent queries need no locking.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    dimension: Option<usize>,
}

impl Corpus {
    /// Builds a corpus after validating every entry.
    ///
    /// # Errors
    /// - [`StoreError::EmptyEmbedding`] for a zero-length embedding
    /// - [`StoreError::NonFinite`] for NaN/inf components
    /// - [`StoreError::InconsistentCorpus`] when dimensions disagree with the first entry
    pub fn from_entries(entries: Vec<CorpusEntry>) -> Result<Self, StoreError> {
        let mut dimension = None;
        for (index, e) in entries.iter().enumerate() {
            let got = e.embedding.len();
            if got == 0 {
                return Err(StoreError::EmptyEmbedding { index });
            }
            if e.embedding.iter().any(|x| !x.is_finite()) {
                return Err(StoreError::NonFinite { index });
            }
            match dimension {
                None => dimension = Some(got),
                Some(expected) if expected != got => {
                    return Err(StoreError::InconsistentCorpus {
                        index,
                        expected,
                        got,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(Self { entries, dimension })
    }

    /// Reads and validates a corpus file (JSON array or JSON Lines).
    ///
    /// # Errors
    /// I/O, parse, or validation errors; see [`Corpus::from_entries`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let corpus = Self::from_entries(io_json::read_entries(path.as_ref())?)?;
        info!(
            path = ?path.as_ref(),
            entries = corpus.len(),
            dimension = corpus.dimension().unwrap_or(0),
            "corpus loaded"
        );
        Ok(corpus)
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensionality shared by all entries; `None` when empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Ranks this corpus against a query embedding; see [`retrieve::rank`].
    ///
    /// # Errors
    /// [`StoreError::DimensionMismatch`] if the query has another dimensionality.
    pub fn rank(
        &self,
        query_embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<RankedCandidate>, StoreError> {
        retrieve::rank(query_embedding, &self.entries, top_n)
    }
}
