use std::fmt;

use async_trait::async_trait;

use super::types::{Changeset, EntityRef, WireElement};

/// Errors from fetching OSM data.
/// `NotFound` is an answer, not a failure: the entity does not exist (or
/// was deleted). Everything else means the answer is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The entity or changeset does not exist (HTTP 404/410, or missing
    /// from an otherwise successful response).
    NotFound,
    /// Transport-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The API answered with an unexpected status.
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound => write!(f, "not found"),
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// A read-only source of OSM data.
#[async_trait]
pub trait OsmSource: Send + Sync {
    /// Returns the name of the source (for logs).
    fn name(&self) -> &str;

    /// Fetches an entity. Ways and relations come back with every element
    /// they reference.
    async fn fetch_elements(&self, entity: EntityRef) -> Result<Vec<WireElement>, FetchError>;

    /// Fetches the relations that list `entity` as a member.
    async fn fetch_relations_of(&self, entity: EntityRef) -> Result<Vec<WireElement>, FetchError>;

    async fn fetch_changeset(&self, id: i64) -> Result<Changeset, FetchError>;
}
