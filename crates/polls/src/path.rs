//! Request path interpretation
//!
//! A path is read as `<collection>[/<id>]`: the last segment is an identifier
//! whenever more than one segment is present.

/// Path separating character
pub const PATH_SEPARATOR: char = '/';

/// A parsed request path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollPath {
    path: String,
    id: Option<String>,
}

impl PollPath {
    /// Parse a raw URL path.
    ///
    /// Identifier syntax is not checked here; a malformed id only fails once a
    /// store operation rejects it. An empty path means collection scope.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_matches(PATH_SEPARATOR);

        match trimmed.rsplit_once(PATH_SEPARATOR) {
            Some((path, id)) => Self {
                path: path.to_string(),
                id: Some(id.to_string()).filter(|id| !id.is_empty()),
            },
            None => Self {
                path: trimmed.to_string(),
                id: None,
            },
        }
    }

    /// Collection part of the path
    pub fn collection(&self) -> &str {
        &self.path
    }

    /// Identifier segment, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }
}
