//! API error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_auth::AuthError;
use relay_push::RelayError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by relay endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or empty request fields.
    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid request body")]
    MalformedBody(#[from] JsonRejection),

    #[error("Failed to send notification")]
    Send(#[source] RelayError),

    /// Failure before any multicast target was attempted.
    #[error("Failed to send multicast notifications")]
    Multicast(#[source] AuthError),

    #[error("Failed to register token")]
    Store(color_eyre::eyre::Report),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();

        let (status, body) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, json!({ "error": error })),
            Self::MalformedBody(rejection) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": error, "details": rejection.body_text() }),
            ),
            Self::Send(e) => {
                tracing::error!(error = %e, "error sending message");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "details": e.details() }),
                )
            }
            Self::Multicast(e) => {
                tracing::error!(error = %e, "error in multicast");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "details": e.to_string() }),
                )
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "token store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": error }))
            }
        };

        (status, Json(body)).into_response()
    }
}
