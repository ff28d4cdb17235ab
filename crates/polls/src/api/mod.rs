//! HTTP API for polls

pub mod access;
pub mod envelope;
pub mod handlers;
pub mod routes;

pub use access::{AccessPolicy, ApiKey};
pub use envelope::{ErrorEnvelope, ErrorMessage};
pub use handlers::{PollsApiState, RequestScope};
pub use routes::create_router;
