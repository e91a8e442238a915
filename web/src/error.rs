use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Collapses every domain error into a fixed JSON body per caller-visible kind.
// Provider detail (HTTP status, response body) never reaches the client; the
// domain layer has already logged it server-side.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::TokenExchange => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "OAuth Error" })),
                )
                    .into_response(),
                ExternalErrorKind::MeetingCreation => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Failed to create meeting" })),
                )
                    .into_response(),
                ExternalErrorKind::Network => (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Upstream provider unavailable" })),
                )
                    .into_response(),
                ExternalErrorKind::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response(),
            },
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Config => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Server misconfigured" })),
                )
                    .into_response(),
                InternalErrorKind::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response(),
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
