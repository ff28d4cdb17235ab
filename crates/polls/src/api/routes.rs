//! API routes for polls

use axum::{middleware, routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::api::access::{require_api_key, with_cors};
use crate::api::handlers::{handle_polls, not_found, PollsApiState};

/// Create the polls router
///
/// Routes (all methods, API key required):
/// - `/polls`, `/polls/`  - the collection
/// - `/polls/:id`         - a single poll
///
/// Anything else answers 404. Every response carries the CORS headers.
pub fn create_router(state: PollsApiState) -> Router {
    Router::new()
        .route("/polls", any(handle_polls))
        .route("/polls/", any(handle_polls))
        .route("/polls/*rest", any(handle_polls))
        .route_layer(middleware::from_fn_with_state(
            state.access.clone(),
            require_api_key,
        ))
        .fallback(not_found)
        .layer(middleware::from_fn(with_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
