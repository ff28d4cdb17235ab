//! Poll resource service for Ballots
//!
//! This crate exposes a single collection of poll documents over HTTP.
//!
//! # Features
//!
//! - Poll data model and JSON shape
//! - URL path interpretation (collection vs. single item)
//! - Document store abstraction with per-request sessions
//! - API-key and CORS interceptors
//! - Uniform JSON response envelope
//!
//! # Feature Flags
//!
//! - `api` - Enable HTTP API (default)
//! - `mongo` - Enable the MongoDB document store

pub mod types;
pub mod error;
pub mod path;
pub mod store;

#[cfg(feature = "api")]
pub mod api;

// Re-export commonly used types
pub use types::{CreatePollRequest, Poll, PollId};
pub use error::{PollError, Result};
pub use path::{PollPath, PATH_SEPARATOR};

// Store exports
pub use store::traits::{PollSession, PollStore, StoreError, StoreResult};
pub use store::memory::InMemoryPollStore;
pub use store::{create_store, StoreType};

#[cfg(feature = "mongo")]
pub use store::mongo::MongoPollStore;

#[cfg(feature = "api")]
pub use api::{create_router, AccessPolicy, ApiKey, PollsApiState};
