use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use corpus_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Bind { .. } | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        } else {
            warn!(code = self.error_code(), error = %self, "request rejected");
        }
        ApiResponse::<()>::error(self.error_code(), self.to_string())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Maps pipeline failures to a precise HTTP status & code.
impl From<ContextorError> for AppError {
    fn from(err: ContextorError) -> Self {
        match err {
            ContextorError::EmptyQuestion => AppError::BadRequest(err.to_string()),
            ContextorError::Upstream(_) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: err.to_string(),
            },
            ContextorError::Store(StoreError::DimensionMismatch { .. }) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "DIMENSION_MISMATCH",
                message: err.to_string(),
            },
            ContextorError::Store(_) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "STORE_ERROR",
                message: err.to_string(),
            },
            ContextorError::UnsupportedModel(_) | ContextorError::Tokenizer(_) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "TOKENIZER_ERROR",
                message: err.to_string(),
            },
            ContextorError::Config(_) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "CONFIG_ERROR",
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_pipeline_errors() {
        let e = AppError::from(ContextorError::EmptyQuestion);
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.error_code(), "BAD_REQUEST");

        let e = AppError::from(ContextorError::Store(StoreError::DimensionMismatch {
            index: 0,
            expected: 2,
            got: 3,
        }));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.error_code(), "DIMENSION_MISMATCH");

        let e = AppError::from(ContextorError::UnsupportedModel("llama3".into()));
        assert_eq!(e.error_code(), "TOKENIZER_ERROR");
    }
}
