use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};

use super::consts::NOT_FOUND_MESSAGE;
use super::response::{DetailedErrorResponse, ErrorMessage, ErrorResponse};

const SERVER_ERROR_MESSAGE: &str = "server error";

#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
}

/// How much of a store failure is shown to clients. Picked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Generic message only.
    Opaque,
    /// Underlying error text included in the body.
    Detailed,
}

/// Attached to 500 responses so [`render_store_failures`] can apply the policy.
#[derive(Debug, Clone)]
pub struct StoreFailure(pub String);

impl IntoResponse for ArticleError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(NOT_FOUND_MESSAGE)),
            )
                .into_response(),
            Self::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            Self::Store(e) => {
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(SERVER_ERROR_MESSAGE)),
                )
                    .into_response();
                response.extensions_mut().insert(StoreFailure(e.to_string()));
                response
            }
        }
    }
}

/// Top-level handler for store failures: logs them and, under
/// [`ErrorPolicy::Detailed`], swaps the generic body for one carrying the detail.
pub async fn render_store_failures(
    State(policy): State<ErrorPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(StoreFailure(detail)) = response.extensions_mut().remove::<StoreFailure>() else {
        return response;
    };

    tracing::error!("Store failure: {}", detail);
    match policy {
        ErrorPolicy::Opaque => response,
        ErrorPolicy::Detailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DetailedErrorResponse {
                message: detail.clone(),
                error: ErrorMessage { message: detail },
            }),
        )
            .into_response(),
    }
}
