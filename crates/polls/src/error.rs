//! Poll API error types

use thiserror::Error;

use crate::store::traits::StoreError;

/// Errors that can end a poll request
///
/// Each variant maps to exactly one HTTP status. The display text is the message
/// sent to the client, so it never carries store detail.
#[derive(Error, Debug)]
pub enum PollError {
    /// Missing or wrong API key
    #[error("invalid API key")]
    Unauthorized,

    /// Request body could not be decoded
    #[error("{0}")]
    BadRequest(String),

    /// Operation refused for safety (bulk delete)
    #[error("{0}")]
    NotAllowed(String),

    /// Unmatched route or method
    #[error("Not Found")]
    NotFound,

    /// Any datastore failure
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl PollError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not allowed error
    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::NotAllowed(message.into())
    }

    /// Wrap a store error with the message shown to the client
    pub fn store(context: &'static str, source: StoreError) -> Self {
        Self::Store { context, source }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::BadRequest(_) => 400,
            Self::NotAllowed(_) => 405,
            Self::NotFound => 404,
            Self::Store { .. } => 500,
        }
    }
}

/// Result type for poll operations
pub type Result<T> = std::result::Result<T, PollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PollError::Unauthorized.status_code(), 401);
        assert_eq!(PollError::bad_request("bad").status_code(), 400);
        assert_eq!(PollError::not_allowed("no").status_code(), 405);
        assert_eq!(PollError::NotFound.status_code(), 404);
        assert_eq!(
            PollError::store("failed to insert poll", StoreError::Backend("boom".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_store_detail_is_not_displayed() {
        let err = PollError::store("failed to delete poll", StoreError::Backend("socket closed".into()));
        assert_eq!(err.to_string(), "failed to delete poll");
    }
}
