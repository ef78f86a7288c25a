use serde::{Deserialize, Serialize};

/// Longest passage preview returned to clients, in characters.
pub const PREVIEW_CHARS: usize = 800;

/// Request payload for /ask_question.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question about the handbook.
    pub question: String,
    /// Optional override: number of ranked passages offered to the prompt.
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Response payload for /ask_question.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Final model answer (plain text).
    pub answer: String,
    /// Passages that were placed in the prompt, most related first.
    pub context: Vec<CtxItem>,
    pub prompt_tokens: usize,
}

#[derive(Debug, Serialize)]
pub struct CtxItem {
    pub score: f32,
    /// Passage text, cut to [`PREVIEW_CHARS`].
    pub preview: String,
}

/// Cuts `text` to at most `max` chars on a char boundary, marking the cut.
pub fn clamp_preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((idx, _)) => format!("{}…", &text[..idx]),
    }
}
