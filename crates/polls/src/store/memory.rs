//! In-memory poll store implementation

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::store::traits::{PollSession, PollStore, StoreError, StoreResult};
use crate::types::{Poll, PollId};

/// In-memory poll store for testing and development
///
/// Polls are kept in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryPollStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    polls: RwLock<Vec<Poll>>,
    open_sessions: AtomicUsize,
}

impl InMemoryPollStore {
    /// Create a new in-memory poll store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently open
    pub fn open_sessions(&self) -> usize {
        self.inner.open_sessions.load(Ordering::SeqCst)
    }

    /// Number of stored polls
    pub fn len(&self) -> usize {
        self.inner.polls.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PollStore for InMemoryPollStore {
    async fn session(&self) -> StoreResult<Box<dyn PollSession>> {
        let open = self.inner.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(open, "Opened in-memory session");
        Ok(Box::new(InMemorySession {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct InMemorySession {
    inner: Arc<Inner>,
}

impl InMemorySession {
    fn check_id(id: &str) -> StoreResult<()> {
        if PollId::is_well_formed(id) {
            Ok(())
        } else {
            Err(StoreError::InvalidId(id.to_string()))
        }
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        let open = self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(open, "Closed in-memory session");
    }
}

#[async_trait]
impl PollSession for InMemorySession {
    async fn find_all(&mut self) -> StoreResult<Vec<Poll>> {
        Ok(self.inner.polls.read().clone())
    }

    async fn find_by_id(&mut self, id: &str) -> StoreResult<Poll> {
        Self::check_id(id)?;
        self.inner
            .polls
            .read()
            .iter()
            .find(|p| p.id.as_str() == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&mut self, poll: &Poll) -> StoreResult<()> {
        Self::check_id(poll.id.as_str())?;

        let mut polls = self.inner.polls.write();
        if polls.iter().any(|p| p.id == poll.id) {
            return Err(StoreError::DuplicateId(poll.id.to_string()));
        }
        polls.push(poll.clone());
        Ok(())
    }

    async fn remove_by_id(&mut self, id: &str) -> StoreResult<()> {
        Self::check_id(id)?;

        let mut polls = self.inner.polls.write();
        match polls.iter().position(|p| p.id.as_str() == id) {
            Some(index) => {
                polls.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreatePollRequest;
    use assert_matches::assert_matches;

    fn create_test_poll(title: &str) -> Poll {
        Poll::new(
            PollId::generate(),
            CreatePollRequest {
                title: title.to_string(),
                options: vec!["yes".to_string(), "no".to_string()],
                results: Default::default(),
            },
            Some("abc123ABC"),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryPollStore::new();
        let poll = create_test_poll("lunch?");

        let mut session = store.session().await.unwrap();
        session.insert(&poll).await.unwrap();

        let found = session.find_by_id(poll.id.as_str()).await.unwrap();
        assert_eq!(found, poll);
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = InMemoryPollStore::new();
        let mut session = store.session().await.unwrap();

        for i in 0..5 {
            session.insert(&create_test_poll(&format!("poll {}", i))).await.unwrap();
        }

        let polls = session.find_all().await.unwrap();
        let titles: Vec<_> = polls.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["poll 0", "poll 1", "poll 2", "poll 3", "poll 4"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryPollStore::new();
        let poll = create_test_poll("remove me");
        let mut session = store.session().await.unwrap();
        session.insert(&poll).await.unwrap();

        session.remove_by_id(poll.id.as_str()).await.unwrap();

        assert!(store.is_empty());
        assert_matches!(
            session.find_by_id(poll.id.as_str()).await,
            Err(StoreError::NotFound(_))
        );
        assert_matches!(
            session.remove_by_id(poll.id.as_str()).await,
            Err(StoreError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryPollStore::new();
        let poll = create_test_poll("twice");
        let mut session = store.session().await.unwrap();

        session.insert(&poll).await.unwrap();
        assert_matches!(session.insert(&poll).await, Err(StoreError::DuplicateId(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_id_rejected() {
        let store = InMemoryPollStore::new();
        let mut session = store.session().await.unwrap();

        assert_matches!(session.find_by_id("xyz").await, Err(StoreError::InvalidId(_)));
        assert_matches!(session.remove_by_id("xyz").await, Err(StoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_sessions_are_released_on_drop() {
        let store = InMemoryPollStore::new();
        assert_eq!(store.open_sessions(), 0);

        let first = store.session().await.unwrap();
        let second = store.session().await.unwrap();
        assert_eq!(store.open_sessions(), 2);

        drop(first);
        assert_eq!(store.open_sessions(), 1);
        drop(second);
        assert_eq!(store.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_sessions_share_the_collection() {
        let store = InMemoryPollStore::new();
        let poll = create_test_poll("shared");

        store.session().await.unwrap().insert(&poll).await.unwrap();

        let mut other = store.session().await.unwrap();
        assert_eq!(other.find_all().await.unwrap().len(), 1);
    }
}
