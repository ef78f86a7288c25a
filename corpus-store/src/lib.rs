//! In-memory handbook corpus and similarity ranking.
//!
//! This crate provides:
//! - Loading a corpus of `{text, embedding}` rows from JSON / JSON Lines
//! - Cosine-similarity ranking of the corpus against a query embedding
//! - The [`EmbeddingsProvider`] seam used to embed queries

mod corpus;
mod embed;
mod errors;
mod io_json;
mod record;
mod retrieve;
pub mod similarity;

pub use corpus::Corpus;
pub use embed::{EmbeddingsProvider, llm_embedder::LlmEmbedder};
pub use errors::StoreError;
pub use io_json::read_entries;
pub use record::{CorpusEntry, RankedCandidate};
pub use retrieve::rank;
