//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// Options that control retrieval for a single question.
///
/// Setting a field to `0` means: "use the configured default".
///
/// # Example
/// ```
/// use contextor::AskOptions;
/// let opts = AskOptions { top_n: 20 };
/// assert_eq!(AskOptions::default().top_n, 0);
/// # let _ = opts;
/// ```
#[derive(Clone, Debug, Default)]
pub struct AskOptions {
    /// Number of ranked passages offered to the prompt assembler.
    /// If `0`, `RAG_TOP_N` from config is used.
    pub top_n: usize,
}

/// A passage that made it into the prompt.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UsedPassage {
    pub score: f32,
    pub text: String,
}

/// Final answer together with the exact context passed to the model.
#[derive(Clone, Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<UsedPassage>,
    /// Token count of the user prompt sent to the model.
    pub prompt_tokens: usize,
}
