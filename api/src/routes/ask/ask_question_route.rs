//! POST /ask_question: answers a handbook question with ranked context.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use contextor::{AskOptions, QaAnswer};
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse, CtxItem, PREVIEW_CHARS, clamp_preview},
};

/// Handler: POST /ask_question
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/ask_question \
///   -H 'content-type: application/json' \
///   -d '{"question":"When should I use my turn signal?","top_n":20}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<ApiResponse<AskResponse>> {
    let Json(body) = payload?;
    let opts = AskOptions {
        top_n: body.top_n.unwrap_or(0),
    };
    info!(question_len = body.question.len(), top_n = opts.top_n, "ask_question");

    let QaAnswer {
        answer,
        context,
        prompt_tokens,
    } = state.contextor.ask_with_opts(&body.question, opts).await?;

    let context = context
        .into_iter()
        .map(|u| CtxItem {
            score: u.score,
            preview: clamp_preview(&u.text, PREVIEW_CHARS),
        })
        .collect();

    Ok(ApiResponse::success(AskResponse {
        answer,
        context,
        prompt_tokens,
    }))
}
