//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::access::{TravelMode, tags};
use crate::core::state::Session;
use crate::map::board::LayerBoard;
use crate::osm::{
    Changeset, EntityRef, EntityStore, EntityType, FetchError, OsmSource, WireElement, WireMember,
};

/// An in-memory `OsmSource` that counts the requests it serves.
/// Unknown entities and changesets are `NotFound`; unknown membership
/// lookups return no relations.
#[derive(Default)]
pub struct FakeSource {
    elements: HashMap<EntityRef, Vec<WireElement>>,
    relations: HashMap<EntityRef, Vec<WireElement>>,
    changesets: HashMap<i64, Changeset>,
    failing: Vec<EntityRef>,
    yielding: bool,
    pub entity_calls: AtomicUsize,
    pub membership_calls: AtomicUsize,
    pub changeset_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(mut self, entity: EntityRef, elements: Vec<WireElement>) -> Self {
        self.elements.insert(entity, elements);
        self
    }

    pub fn with_relations(mut self, entity: EntityRef, relations: Vec<WireElement>) -> Self {
        self.relations.insert(entity, relations);
        self
    }

    pub fn with_changeset(mut self, id: i64, user: &str, comment: Option<&str>) -> Self {
        let tags = comment.map(|c| tags(&[("comment", c)])).unwrap_or_default();
        self.changesets.insert(
            id,
            Changeset {
                id,
                user: user.to_string(),
                tags,
            },
        );
        self
    }

    /// Requests for `entity` fail with a network error.
    pub fn failing(mut self, entity: EntityRef) -> Self {
        self.failing.push(entity);
        self
    }

    /// Every request yields to the scheduler once before answering, so
    /// concurrent callers actually overlap.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    async fn pause(&self) {
        if self.yielding {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl OsmSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_elements(&self, entity: EntityRef) -> Result<Vec<WireElement>, FetchError> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.failing.contains(&entity) {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        self.elements.get(&entity).cloned().ok_or(FetchError::NotFound)
    }

    async fn fetch_relations_of(&self, entity: EntityRef) -> Result<Vec<WireElement>, FetchError> {
        self.membership_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.failing.contains(&entity) {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        Ok(self.relations.get(&entity).cloned().unwrap_or_default())
    }

    async fn fetch_changeset(&self, id: i64) -> Result<Changeset, FetchError> {
        self.changeset_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.changesets.get(&id).cloned().ok_or(FetchError::NotFound)
    }
}

fn wire(kind: EntityType, id: i64, pairs: &[(&str, &str)]) -> WireElement {
    WireElement {
        kind,
        id,
        version: 1,
        timestamp: None,
        changeset: 1,
        user: "mapper".to_string(),
        tags: tags(pairs),
        nodes: Vec::new(),
        members: Vec::new(),
    }
}

pub fn wire_node(id: i64) -> WireElement {
    wire(EntityType::Node, id, &[])
}

pub fn wire_way(id: i64, nodes: &[i64], pairs: &[(&str, &str)]) -> WireElement {
    WireElement {
        nodes: nodes.to_vec(),
        ..wire(EntityType::Way, id, pairs)
    }
}

pub fn wire_relation(
    id: i64,
    members: &[(EntityType, i64, &str)],
    pairs: &[(&str, &str)],
) -> WireElement {
    WireElement {
        members: members
            .iter()
            .map(|(kind, reference, role)| WireMember {
                kind: *kind,
                reference: *reference,
                role: role.to_string(),
            })
            .collect(),
        ..wire(EntityType::Relation, id, pairs)
    }
}

/// Creates a foot-mode session over an empty `FakeSource`.
pub fn test_session() -> Session<LayerBoard> {
    test_session_with(FakeSource::new())
}

pub fn test_session_with(source: FakeSource) -> Session<LayerBoard> {
    Session::new(
        EntityStore::new(Arc::new(source)),
        LayerBoard::new(),
        TravelMode::Foot,
    )
}
