//! Typed error for the contextor crate.

use ai_llm_service::{AiLlmError, ProviderError};
use corpus_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// No token encoding is known for the model id.
    #[error("unsupported tokenizer model: {0}")]
    UnsupportedModel(String),

    /// The encoding exists but could not be constructed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Corpus loading or ranking failed (including dimension mismatches).
    #[error("corpus error: {0}")]
    Store(#[from] StoreError),

    /// Embedding or chat provider failed after retries.
    #[error("upstream error: {0}")]
    Upstream(#[from] ProviderError),

    /// The caller sent a blank question.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Provider configuration could not be resolved.
    #[error("config error: {0}")]
    Config(#[from] AiLlmError),
}
