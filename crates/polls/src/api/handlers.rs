//! API handlers for the poll collection
//!
//! One handler serves every method on the collection route and dispatches on the
//! HTTP method. Each store-backed operation opens its own session and drops it
//! before returning.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{ACCESS_CONTROL_ALLOW_METHODS, LOCATION},
        HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Extension,
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::api::access::{AccessPolicy, ApiKey};
use crate::api::envelope::{decode_body, respond, respond_empty, respond_http_err};
use crate::error::{PollError, Result};
use crate::path::PollPath;
use crate::store::traits::{PollSession, PollStore};
use crate::types::{CreatePollRequest, Poll, PollId};

const SESSION_FAILED: &str = "failed to open store session";
const QUERY_FAILED: &str = "failed to query polls";
const INSERT_FAILED: &str = "failed to insert poll";
const DELETE_FAILED: &str = "failed to delete poll";
const READ_POLL_FAILED: &str = "failed to read poll from request";
const DELETE_ALL_REFUSED: &str = "Cannot delete all polls!";

/// State for the polls API - uses Arc for Clone
#[derive(Clone)]
pub struct PollsApiState {
    pub store: Arc<dyn PollStore>,
    pub access: AccessPolicy,
}

impl PollsApiState {
    pub fn new(store: Arc<dyn PollStore>, access: AccessPolicy) -> Self {
        Self { store, access }
    }
}

/// Everything an operation needs to know about the current request
///
/// Built once per request by [`handle_polls`] and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RequestScope {
    pub path: PollPath,
    pub api_key: Option<ApiKey>,
}

/// Method dispatcher for `/polls/`
#[instrument(skip_all, fields(%method, path = %uri.path()))]
pub async fn handle_polls(
    State(state): State<PollsApiState>,
    method: Method,
    uri: Uri,
    api_key: Option<Extension<ApiKey>>,
    body: Body,
) -> Response {
    let scope = RequestScope {
        path: PollPath::parse(uri.path()),
        api_key: api_key.map(|Extension(key)| key),
    };

    let result = match method {
        Method::GET => get_polls(&state, &scope).await,
        Method::POST => create_poll(&state, &scope, body).await,
        Method::DELETE => delete_poll(&state, &scope).await,
        Method::OPTIONS => Ok(options()),
        _ => Err(PollError::NotFound),
    };

    result.unwrap_or_else(|err| {
        if let PollError::Store { source, .. } = &err {
            error!(error = %source, "{}", err);
        }
        err.into_response()
    })
}

/// Fallback for unmatched routes
pub async fn not_found() -> Response {
    respond_http_err(StatusCode::NOT_FOUND)
}

async fn open_session(state: &PollsApiState) -> Result<Box<dyn PollSession>> {
    state
        .store
        .session()
        .await
        .map_err(|e| PollError::store(SESSION_FAILED, e))
}

/// Read one poll (path has an id) or the whole collection
async fn get_polls(state: &PollsApiState, scope: &RequestScope) -> Result<Response> {
    let mut session = open_session(state).await?;

    match scope.path.id() {
        Some(id) => {
            let poll = session
                .find_by_id(id)
                .await
                .map_err(|e| PollError::store(QUERY_FAILED, e))?;
            Ok(respond(StatusCode::OK, Some(&poll)))
        }
        None => {
            let polls = session
                .find_all()
                .await
                .map_err(|e| PollError::store(QUERY_FAILED, e))?;
            Ok(respond(StatusCode::OK, Some(&polls)))
        }
    }
}

/// Create a poll in the collection; any id in the path is ignored
async fn create_poll(state: &PollsApiState, scope: &RequestScope, body: Body) -> Result<Response> {
    let mut session = open_session(state).await?;

    let request: CreatePollRequest = decode_body(body).await.map_err(|e| {
        warn!(error = %e, "Rejected poll body");
        PollError::bad_request(READ_POLL_FAILED)
    })?;

    let poll = Poll::new(
        PollId::generate(),
        request,
        scope.api_key.as_ref().map(ApiKey::as_str),
    );

    session
        .insert(&poll)
        .await
        .map_err(|e| PollError::store(INSERT_FAILED, e))?;

    info!(id = %poll.id, title = %poll.title, "Created poll");

    let mut response = respond_empty(StatusCode::CREATED);
    if let Ok(location) = HeaderValue::from_str(&poll.location()) {
        response.headers_mut().insert(LOCATION, location);
    }
    Ok(response)
}

/// Delete one poll; deleting the whole collection is refused
async fn delete_poll(state: &PollsApiState, scope: &RequestScope) -> Result<Response> {
    let mut session = open_session(state).await?;

    let Some(id) = scope.path.id() else {
        warn!("Refused to delete all polls");
        return Err(PollError::not_allowed(DELETE_ALL_REFUSED));
    };

    session
        .remove_by_id(id)
        .await
        .map_err(|e| PollError::store(DELETE_FAILED, e))?;

    info!(id, "Deleted poll");
    Ok(respond_empty(StatusCode::OK))
}

/// Preflight: allow DELETE over CORS
fn options() -> Response {
    let mut response = respond_empty(StatusCode::OK);
    response
        .headers_mut()
        .append(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("DELETE"));
    response
}
