use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::TagSet;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Node,
    Way,
    Relation,
}

impl EntityType {
    pub fn name(self) -> &'static str {
        match self {
            EntityType::Node => "node",
            EntityType::Way => "way",
            EntityType::Relation => "relation",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of an OSM entity. Cache key for every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub kind: EntityType,
    pub id: i64,
}

impl EntityRef {
    pub fn new(kind: EntityType, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn node(id: i64) -> Self {
        Self::new(EntityType::Node, id)
    }

    pub fn way(id: i64) -> Self {
        Self::new(EntityType::Way, id)
    }

    pub fn relation(id: i64) -> Self {
        Self::new(EntityType::Relation, id)
    }
}

/// Renders as `type/id`, the form used in URL fragments and API paths.
impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefParseError(pub String);

impl fmt::Display for RefParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not an entity reference (expected type/id): {}", self.0)
    }
}

impl std::error::Error for RefParseError {}

impl FromStr for EntityRef {
    type Err = RefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RefParseError(s.to_string());
        let (kind, id) = s.split_once('/').ok_or_else(err)?;
        let kind = match kind {
            "node" => EntityType::Node,
            "way" => EntityType::Way,
            "relation" => EntityType::Relation,
            _ => return Err(err()),
        };
        let id = id.parse::<i64>().map_err(|_| err())?;
        Ok(EntityRef { kind, id })
    }
}

/// Whether a cached entity came from a full fetch or was only seen in
/// passing (e.g. as a relation in a membership lookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    Partial,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub entity: EntityRef,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub reference: EntityRef,
    pub version: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub changeset: i64,
    pub user: String,
    pub tags: TagSet,
    /// Way nodes (empty role) or relation members, in order.
    pub members: Vec<Member>,
}

/// A relation that lists an entity as one of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub relation: EntityRef,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Changeset {
    pub id: i64,
    pub user: String,
    pub tags: TagSet,
}

impl Changeset {
    pub fn comment(&self) -> Option<&str> {
        self.tags.get("comment").map(String::as_str)
    }
}

// ============================================================================
// OSM API 0.6 JSON
// ============================================================================

#[derive(Deserialize, Debug, Clone)]
pub struct WireMember {
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

/// One element of an `{"elements": [...]}` response.
#[derive(Deserialize, Debug, Clone)]
pub struct WireElement {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub id: i64,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub changeset: i64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default)]
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub members: Vec<WireMember>,
}

impl From<WireElement> for Entity {
    fn from(el: WireElement) -> Self {
        let members = match el.kind {
            EntityType::Node => Vec::new(),
            EntityType::Way => el
                .nodes
                .into_iter()
                .map(|id| Member {
                    entity: EntityRef::node(id),
                    role: String::new(),
                })
                .collect(),
            EntityType::Relation => el
                .members
                .into_iter()
                .map(|m| Member {
                    entity: EntityRef::new(m.kind, m.reference),
                    role: m.role,
                })
                .collect(),
        };
        Entity {
            reference: EntityRef::new(el.kind, el.id),
            version: el.version,
            timestamp: el.timestamp,
            changeset: el.changeset,
            user: el.user,
            tags: el.tags,
            members,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ElementsResponse {
    #[serde(default)]
    pub elements: Vec<WireElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WireChangeset {
    pub id: i64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub tags: TagSet,
}

impl From<WireChangeset> for Changeset {
    fn from(cs: WireChangeset) -> Self {
        Changeset {
            id: cs.id,
            user: cs.user,
            tags: cs.tags,
        }
    }
}

/// Changeset responses come either as `{"elements": [...]}` or, on newer
/// API deployments, as `{"changeset": {...}}`.
#[derive(Deserialize, Debug, Default)]
pub struct ChangesetResponse {
    #[serde(default)]
    pub elements: Vec<WireChangeset>,
    #[serde(default)]
    pub changeset: Option<WireChangeset>,
}

impl ChangesetResponse {
    pub fn into_changeset(self) -> Option<Changeset> {
        self.changeset
            .or_else(|| self.elements.into_iter().next())
            .map(Changeset::from)
    }
}
