//! Error responses for the menu endpoints
//!
//! The whole error taxonomy maps to wire responses exactly once, here.
//! Handlers translate failures into a variant; the envelope shape is
//! shared by every endpoint.

use crate::auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy for the menu endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or invalid input, duplicate title, or storage write failure
    #[error("bad request")]
    BadRequest,

    /// Missing drink or failed read
    #[error("not found")]
    NotFound,

    /// Reserved for semantic validation failures
    #[error("unprocessable")]
    Unprocessable,

    /// Authorization failures carry their own status and message
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(err) => {
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

/// Wire shape shared by every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
