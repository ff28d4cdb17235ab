//! PollStore trait definition

use async_trait::async_trait;

use crate::types::Poll;

/// Errors that can occur in a document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Poll not found: {0}")]
    NotFound(String),

    #[error("Invalid poll id: {0}")]
    InvalidId(String),

    #[error("Duplicate poll id: {0}")]
    DuplicateId(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store holding the poll collection
///
/// The store itself is shared across requests. Work happens through sessions:
/// every request opens its own and drops it when done.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Open a session for one request
    async fn session(&self) -> StoreResult<Box<dyn PollSession>>;
}

/// A per-request handle to the poll collection
///
/// Dropping the session releases it.
#[async_trait]
pub trait PollSession: Send {
    /// All polls, no limit and no filter
    async fn find_all(&mut self) -> StoreResult<Vec<Poll>>;

    /// Exactly one poll
    ///
    /// # Returns
    /// `StoreError::NotFound` if no poll has this id
    async fn find_by_id(&mut self, id: &str) -> StoreResult<Poll>;

    /// Insert a poll whose id is already assigned
    async fn insert(&mut self, poll: &Poll) -> StoreResult<()>;

    /// Remove one poll
    ///
    /// # Returns
    /// `StoreError::NotFound` if no poll has this id
    async fn remove_by_id(&mut self, id: &str) -> StoreResult<()>;
}
