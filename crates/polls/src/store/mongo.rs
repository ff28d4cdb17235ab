//! MongoDB poll store implementation
//!
//! Polls live in one collection (`ballots.polls` by default) with the poll id
//! stored as `_id`. Every request session is backed by its own `ClientSession`.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, ClientSession, Collection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::store::traits::{PollSession, PollStore, StoreError, StoreResult};
use crate::types::{Poll, PollId};
use config::MongoConfig;

/// Poll as stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PollDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    results: BTreeMap<String, i64>,
    #[serde(rename = "apikey", default)]
    api_key: String,
}

impl From<&Poll> for PollDocument {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id.to_string(),
            title: poll.title.clone(),
            options: poll.options.clone(),
            results: poll.results.clone(),
            api_key: poll.api_key.clone(),
        }
    }
}

impl From<PollDocument> for Poll {
    fn from(document: PollDocument) -> Self {
        Self {
            id: PollId::from(document.id),
            title: document.title,
            options: document.options,
            results: document.results,
            api_key: document.api_key,
        }
    }
}

/// MongoDB duplicate key error code
const DUPLICATE_KEY: i32 = 11000;

fn backend_error(e: mongodb::error::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// MongoDB poll store
///
/// The driver pools connections internally; the store only hands out sessions.
pub struct MongoPollStore {
    client: Client,
    collection: Collection<PollDocument>,
}

impl MongoPollStore {
    /// Connect to MongoDB
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        info!(
            uri = %config.uri,
            database = %config.database,
            collection = %config.collection,
            "Connecting to MongoDB"
        );

        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let collection = client
            .database(&config.database)
            .collection::<PollDocument>(&config.collection);

        Ok(Self { client, collection })
    }
}

#[async_trait]
impl PollStore for MongoPollStore {
    async fn session(&self) -> StoreResult<Box<dyn PollSession>> {
        let session = self
            .client
            .start_session(None)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        debug!("Opened MongoDB session");

        Ok(Box::new(MongoSession {
            collection: self.collection.clone(),
            session,
        }))
    }
}

struct MongoSession {
    collection: Collection<PollDocument>,
    session: ClientSession,
}

impl MongoSession {
    fn check_id(id: &str) -> StoreResult<()> {
        if PollId::is_well_formed(id) {
            Ok(())
        } else {
            Err(StoreError::InvalidId(id.to_string()))
        }
    }
}

#[async_trait]
impl PollSession for MongoSession {
    async fn find_all(&mut self) -> StoreResult<Vec<Poll>> {
        let mut cursor = self
            .collection
            .find_with_session(None, None, &mut self.session)
            .await
            .map_err(backend_error)?;

        let documents: Vec<PollDocument> = cursor
            .stream(&mut self.session)
            .try_collect()
            .await
            .map_err(backend_error)?;

        Ok(documents.into_iter().map(Poll::from).collect())
    }

    async fn find_by_id(&mut self, id: &str) -> StoreResult<Poll> {
        Self::check_id(id)?;

        self.collection
            .find_one_with_session(doc! { "_id": id }, None, &mut self.session)
            .await
            .map_err(backend_error)?
            .map(Poll::from)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&mut self, poll: &Poll) -> StoreResult<()> {
        Self::check_id(poll.id.as_str())?;

        self.collection
            .insert_one_with_session(PollDocument::from(poll), None, &mut self.session)
            .await
            .map_err(|e| {
                if matches!(*e.kind, ErrorKind::Write(WriteFailure::WriteError(ref w)) if w.code == DUPLICATE_KEY) {
                    StoreError::DuplicateId(poll.id.to_string())
                } else {
                    backend_error(e)
                }
            })?;

        Ok(())
    }

    async fn remove_by_id(&mut self, id: &str) -> StoreResult<()> {
        Self::check_id(id)?;

        let result = self
            .collection
            .delete_one_with_session(doc! { "_id": id }, None, &mut self.session)
            .await
            .map_err(backend_error)?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreatePollRequest;
    use mongodb::bson::{self, Bson};

    fn sample_poll(results: BTreeMap<String, i64>) -> Poll {
        Poll::new(
            PollId::from("0123456789abcdef0123456789abcdef"),
            CreatePollRequest {
                title: "Tabs or spaces".into(),
                options: vec!["tabs".into(), "spaces".into()],
                results,
            },
            Some("abc123ABC"),
        )
    }

    #[test]
    fn test_document_field_names() {
        let poll = sample_poll(BTreeMap::new());
        let document = bson::to_document(&PollDocument::from(&poll)).unwrap();

        assert_eq!(
            document.get_str("_id").unwrap(),
            "0123456789abcdef0123456789abcdef"
        );
        assert!(!document.contains_key("id"));
        assert_eq!(document.get_str("apikey").unwrap(), "abc123ABC");
        assert!(!document.contains_key("api_key"));
        assert!(!document.contains_key("results"));
    }

    #[test]
    fn test_document_keeps_results() {
        let poll = sample_poll(BTreeMap::from([("tabs".to_string(), 4)]));
        let document = bson::to_document(&PollDocument::from(&poll)).unwrap();

        let results = document.get_document("results").unwrap();
        assert_eq!(results.get("tabs"), Some(&Bson::Int64(4)));
    }

    #[test]
    fn test_document_round_trip() {
        let poll = sample_poll(BTreeMap::from([("spaces".to_string(), 7)]));
        let document = bson::to_document(&PollDocument::from(&poll)).unwrap();

        let decoded: PollDocument = bson::from_document(document).unwrap();
        assert_eq!(Poll::from(decoded), poll);
    }

    #[test]
    fn test_sparse_document_uses_defaults() {
        let document = doc! { "_id": "abc", "title": "Lunch" };

        let poll = Poll::from(bson::from_document::<PollDocument>(document).unwrap());
        assert_eq!(poll.id.as_str(), "abc");
        assert_eq!(poll.title, "Lunch");
        assert!(poll.options.is_empty());
        assert!(poll.results.is_empty());
        assert!(poll.api_key.is_empty());
    }
}
