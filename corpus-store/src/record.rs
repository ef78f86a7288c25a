//! Record types: corpus entries and ranked candidates.

use serde::Deserialize;

/// One handbook passage with its precomputed embedding.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CorpusEntry {
    pub text: String,
    #[serde(deserialize_with = "crate::io_json::embedding_from_array_or_string")]
    pub embedding: Vec<f32>,
}

impl CorpusEntry {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }
}

/// A passage scored against a query embedding. Higher score = more related.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedCandidate {
    pub text: String,
    pub score: f32,
}
