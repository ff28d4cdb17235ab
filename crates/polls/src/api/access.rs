//! Access control interceptors
//!
//! Two interceptors wrap the poll routes, outermost first:
//!
//! 1. [`with_cors`] - always adds the cross-origin headers, never rejects
//! 2. [`require_api_key`] - rejects with 401 unless the `key` query parameter
//!    matches the configured key, otherwise records it as [`ApiKey`]

use axum::{
    extract::{Query, Request, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS},
        HeaderValue, Uri,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::error::PollError;

/// Compare a presented key against the expected one.
///
/// An empty expected key never matches.
pub fn is_valid_api_key(key: &str, expected: &str) -> bool {
    !expected.is_empty() && key == expected
}

/// Configured access policy
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    api_key: Arc<str>,
}

impl AccessPolicy {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Arc::from(api_key.into()),
        }
    }

    pub fn allows(&self, key: &str) -> bool {
        is_valid_api_key(key, &self.api_key)
    }
}

/// The validated API key of the current request
///
/// Stored in request extensions, which are keyed by type, so nothing else can
/// read or overwrite it by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read the `key` query parameter from a URI
///
/// When `key` is repeated the first value wins.
pub fn api_key_from_uri(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs
        .into_iter()
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value)
}

/// Reject requests without a valid API key
pub async fn require_api_key(
    State(policy): State<AccessPolicy>,
    mut request: Request,
    next: Next,
) -> Response {
    let key = api_key_from_uri(request.uri()).unwrap_or_default();

    if !policy.allows(&key) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with invalid API key"
        );
        return PollError::Unauthorized.into_response();
    }

    request.extensions_mut().insert(ApiKey(key));
    next.run(request).await
}

/// Add CORS headers to every response
pub async fn with_cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("Location"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_api_key() {
        assert!(is_valid_api_key("abc123ABC", "abc123ABC"));
        assert!(!is_valid_api_key("abc123abc", "abc123ABC"));
        assert!(!is_valid_api_key("", "abc123ABC"));
        assert!(!is_valid_api_key("", ""));
    }

    #[test]
    fn test_policy_uses_injected_key() {
        let policy = AccessPolicy::new("s3cret");
        assert!(policy.allows("s3cret"));
        assert!(!policy.allows("abc123ABC"));
    }

    #[test]
    fn test_api_key_from_uri() {
        let uri: Uri = "/polls/?key=abc123ABC".parse().unwrap();
        assert_eq!(api_key_from_uri(&uri).as_deref(), Some("abc123ABC"));

        let uri: Uri = "/polls/?other=1&key=a%20b".parse().unwrap();
        assert_eq!(api_key_from_uri(&uri).as_deref(), Some("a b"));

        let uri: Uri = "/polls/".parse().unwrap();
        assert_eq!(api_key_from_uri(&uri), None);
    }

    #[test]
    fn test_repeated_key_takes_first() {
        let uri: Uri = "/polls/?key=abc123ABC&key=abc123ABC".parse().unwrap();
        assert_eq!(api_key_from_uri(&uri).as_deref(), Some("abc123ABC"));

        let uri: Uri = "/polls/?key=first&key=second".parse().unwrap();
        assert_eq!(api_key_from_uri(&uri).as_deref(), Some("first"));
    }
}
