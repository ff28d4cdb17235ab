//! Poll domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Length of a generated poll identifier (hex characters)
pub const POLL_ID_LEN: usize = 32;

/// Opaque poll identifier
///
/// Identifiers are generated before insertion and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(String);

impl PollId {
    /// Generate a fresh identifier (UUID v4, lowercase hex without dashes)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the value has the shape of a generated identifier
    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == POLL_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PollId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PollId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A poll document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    #[serde(default)]
    pub id: PollId,
    pub title: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub results: BTreeMap<String, i64>,
    /// Key that authorized the creation. Audit only.
    #[serde(rename = "apikey", default)]
    pub api_key: String,
}

impl Poll {
    /// Build a new poll from a create request.
    ///
    /// The identifier and api key always come from the server side, never from the body.
    pub fn new(id: PollId, request: CreatePollRequest, api_key: Option<&str>) -> Self {
        Self {
            id,
            title: request.title,
            options: request.options,
            results: request.results,
            api_key: api_key.unwrap_or_default().to_string(),
        }
    }

    /// Resource path of this poll, relative to the server root
    pub fn location(&self) -> String {
        format!("polls/{}", self.id)
    }
}

/// Body of a create request
///
/// Unknown fields (including `id` and `apikey`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePollRequest {
    pub title: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub results: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreatePollRequest {
        CreatePollRequest {
            title: "Favourite editor".to_string(),
            options: vec!["vim".to_string(), "emacs".to_string()],
            results: BTreeMap::new(),
        }
    }

    #[test]
    fn test_generated_ids_are_unique_and_well_formed() {
        let a = PollId::generate();
        let b = PollId::generate();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), POLL_ID_LEN);
        assert!(PollId::is_well_formed(a.as_str()));
    }

    #[test]
    fn test_is_well_formed() {
        assert!(PollId::is_well_formed("0123456789abcdef0123456789ABCDEF"));
        assert!(!PollId::is_well_formed("not-an-id"));
        assert!(!PollId::is_well_formed(""));
        assert!(!PollId::is_well_formed("0123456789abcdef0123456789abcdeg"));
    }

    #[test]
    fn test_empty_results_are_omitted() {
        let poll = Poll::new(PollId::from("abc"), sample_request(), Some("key"));
        let json = serde_json::to_value(&poll).unwrap();

        assert!(json.get("results").is_none());
        assert_eq!(json["apikey"], "key");
        assert_eq!(json["id"], "abc");
        assert_eq!(json["options"][1], "emacs");

        let decoded: Poll = serde_json::from_value(json).unwrap();
        assert!(decoded.results.is_empty());
        assert_eq!(decoded, poll);
    }

    #[test]
    fn test_results_are_kept_when_present() {
        let mut request = sample_request();
        request.results.insert("vim".to_string(), 3);

        let poll = Poll::new(PollId::from("abc"), request, None);
        let json = serde_json::to_value(&poll).unwrap();

        assert_eq!(json["results"]["vim"], 3);
        assert_eq!(json["apikey"], "");
    }

    #[test]
    fn test_create_request_ignores_client_identity() {
        let body = r#"{"id":"forged","apikey":"forged","title":"t","options":[]}"#;
        let request: CreatePollRequest = serde_json::from_str(body).unwrap();
        let poll = Poll::new(PollId::from("real"), request, Some("secret"));

        assert_eq!(poll.id.as_str(), "real");
        assert_eq!(poll.api_key, "secret");
    }

    #[test]
    fn test_create_request_requires_title() {
        let result = serde_json::from_str::<CreatePollRequest>(r#"{"options":["a"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_location() {
        let poll = Poll::new(PollId::from("abc"), sample_request(), None);
        assert_eq!(poll.location(), "polls/abc");
    }
}
