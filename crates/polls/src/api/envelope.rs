//! JSON response envelope
//!
//! All responses are written through [`respond`]. Errors always take the shape
//! `{"error": {"message": "..."}}`.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::error::PollError;

/// Largest request body accepted by [`decode_body`]
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

/// Errors from [`decode_body`]
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a status and, when `data` is present, its JSON encoding.
pub fn respond<T>(status: StatusCode, data: Option<&T>) -> Response
where
    T: Serialize + ?Sized,
{
    let Some(data) = data else {
        return status.into_response();
    };

    match serde_json::to_vec(data) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!(%e, "Failed to encode response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Write a status with an empty body
pub fn respond_empty(status: StatusCode) -> Response {
    respond::<()>(status, None)
}

/// Write an error envelope whose message is the concatenation of `parts`
pub fn respond_err<I>(status: StatusCode, parts: I) -> Response
where
    I: IntoIterator,
    I::Item: Display,
{
    let message: String = parts.into_iter().map(|part| part.to_string()).collect();
    respond(status, Some(&ErrorEnvelope::new(message)))
}

/// Write an error envelope carrying the standard reason phrase for `status`
pub fn respond_http_err(status: StatusCode) -> Response {
    respond_err(status, [status.canonical_reason().unwrap_or("Unknown Status")])
}

/// Decode a JSON request body.
///
/// The body is consumed whether or not decoding succeeds.
pub async fn decode_body<T: DeserializeOwned>(body: Body) -> Result<T, DecodeError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(DecodeError::Read)?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        respond_err(status, [self])
    }
}
