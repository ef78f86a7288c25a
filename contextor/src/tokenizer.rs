//! Token counting with per-model BPE encodings.
//!
//! Encodings are expensive to build and stateless to use, so each one is
//! constructed once per model id and kept for the process lifetime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tiktoken_rs::{CoreBPE, get_bpe_from_tokenizer, tokenizer::get_tokenizer};
use tracing::debug;

use crate::error::ContextorError;

static ENCODINGS_CELL: OnceLock<Mutex<HashMap<String, Arc<CoreBPE>>>> = OnceLock::new();

fn encodings() -> &'static Mutex<HashMap<String, Arc<CoreBPE>>> {
    ENCODINGS_CELL.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns the cached encoding for `model_id`, building it on first use.
///
/// # Errors
/// - [`ContextorError::UnsupportedModel`] if the model maps to no encoding
/// - [`ContextorError::Tokenizer`] if the encoding fails to load
fn encoding_for(model_id: &str) -> Result<Arc<CoreBPE>, ContextorError> {
    let mut cache = encodings().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(bpe) = cache.get(model_id) {
        return Ok(bpe.clone());
    }

    let tokenizer = get_tokenizer(model_id)
        .ok_or_else(|| ContextorError::UnsupportedModel(model_id.to_string()))?;
    debug!(model = model_id, ?tokenizer, "loading token encoding");
    let bpe = get_bpe_from_tokenizer(tokenizer)
        .map_err(|e| ContextorError::Tokenizer(e.to_string()))?;

    let bpe = Arc::new(bpe);
    cache.insert(model_id.to_string(), bpe.clone());
    Ok(bpe)
}

/// Loads the encoding for `model_id` up-front so a bad model id fails at startup.
///
/// # Errors
/// Same as [`count_tokens`].
pub fn ensure_supported(model_id: &str) -> Result<(), ContextorError> {
    encoding_for(model_id).map(|_| ())
}

/// Number of tokens `text` occupies under `model_id`'s encoding.
///
/// Special-token markers such as `<|endoftext|>` are counted as plain text,
/// the way chat APIs encode message content.
///
/// # Errors
/// [`ContextorError::UnsupportedModel`] if no encoding is known for the model.
///
/// # Example
/// ```
/// use contextor::tokenizer::count_tokens;
/// assert_eq!(count_tokens("hello world", "gpt-3.5-turbo").unwrap(), 2);
/// assert_eq!(count_tokens("", "gpt-3.5-turbo").unwrap(), 0);
/// ```
pub fn count_tokens(text: &str, model_id: &str) -> Result<usize, ContextorError> {
    Ok(encoding_for(model_id)?.encode_ordinary(text).len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_known_model() {
        assert_eq!(count_tokens("", "gpt-3.5-turbo").unwrap(), 0);
        assert_eq!(count_tokens("hello world", "gpt-3.5-turbo").unwrap(), 2);
        let long = "Always signal before changing lanes. ".repeat(20);
        let n = count_tokens(&long, "gpt-3.5-turbo").unwrap();
        assert!(n > 20 && n < long.len());
    }

    #[test]
    fn special_token_markers_count_as_text() {
        let n = count_tokens("<|endoftext|>", "gpt-3.5-turbo").unwrap();
        assert!(n > 1, "counted {n}");
        let many = "<|endoftext|>".repeat(10);
        assert!(count_tokens(&many, "gpt-3.5-turbo").unwrap() > 10);
    }

    #[test]
    fn deterministic_and_cached() {
        let text = "Check your mirrors and blind spot.";
        let a = count_tokens(text, "gpt-4").unwrap();
        let b = count_tokens(text, "gpt-4").unwrap();
        assert_eq!(a, b);
        let cache = encodings().lock().unwrap();
        assert!(cache.contains_key("gpt-4"));
    }

    #[test]
    fn unknown_model_is_rejected() {
        match count_tokens("anything", "definitely-not-a-model") {
            Err(ContextorError::UnsupportedModel(m)) => assert_eq!(m, "definitely-not-a-model"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(ensure_supported("definitely-not-a-model").is_err());
        assert!(ensure_supported("gpt-3.5-turbo").is_ok());
    }
}
