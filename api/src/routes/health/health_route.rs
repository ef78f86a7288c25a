//! GET /health: liveness plus the size of the loaded corpus.

use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub corpus_entries: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse {
        status: "ok",
        corpus_entries: state.contextor.corpus().len(),
    })
}
