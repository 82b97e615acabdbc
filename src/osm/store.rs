//! # Entity Store
//!
//! Session-wide cache of OSM entities, relation memberships and
//! changesets. Grow-only: entries are created on first fetch, upgraded
//! from partial to full, never evicted.
//!
//! ```text
//! EntityStore (Clone, Arc inside)
//! └── StoreInner
//!     ├── source: Arc<dyn OsmSource>
//!     └── caches: Mutex<Caches>
//!         ├── entities:    EntityRef → (Entity, Completeness)
//!         ├── memberships: EntityRef → Vec<Membership>
//!         ├── changesets:  id → Changeset
//!         └── in-flight fetches (Shared futures, one per key)
//! ```
//!
//! Concurrent requests for the same key await the same shared future, so
//! the source sees at most one request per key at a time. The mutex is
//! never held across an await, and each response is written in a single
//! critical section.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::debug;

use super::source::{FetchError, OsmSource};
use super::types::{Changeset, Completeness, Entity, EntityRef, Membership};

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, FetchError>>>;

#[derive(Debug, Clone)]
struct CachedEntity {
    entity: Entity,
    completeness: Completeness,
}

#[derive(Default)]
struct Caches {
    entities: HashMap<EntityRef, CachedEntity>,
    memberships: HashMap<EntityRef, Vec<Membership>>,
    changesets: HashMap<i64, Changeset>,
    entity_fetches: HashMap<EntityRef, SharedFetch<Entity>>,
    membership_fetches: HashMap<EntityRef, SharedFetch<Vec<Membership>>>,
    changeset_fetches: HashMap<i64, SharedFetch<Changeset>>,
}

impl Caches {
    /// Inserts or upgrades an entity. A full entry is never replaced by a
    /// partial one.
    fn upsert(&mut self, entity: Entity, completeness: Completeness) {
        let key = entity.reference;
        if completeness == Completeness::Partial
            && self
                .entities
                .get(&key)
                .is_some_and(|c| c.completeness == Completeness::Full)
        {
            return;
        }
        self.entities.insert(key, CachedEntity { entity, completeness });
    }
}

struct StoreInner {
    source: Arc<dyn OsmSource>,
    caches: Mutex<Caches>,
}

impl StoreInner {
    fn lock(&self) -> MutexGuard<'_, Caches> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct EntityStore {
    inner: Arc<StoreInner>,
}

impl EntityStore {
    pub fn new(source: Arc<dyn OsmSource>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                source,
                caches: Mutex::new(Caches::default()),
            }),
        }
    }

    /// Returns the cached entity, full or partial.
    pub fn cached(&self, entity: EntityRef) -> Option<Entity> {
        self.inner.lock().entities.get(&entity).map(|c| c.entity.clone())
    }

    pub fn completeness(&self, entity: EntityRef) -> Option<Completeness> {
        self.inner.lock().entities.get(&entity).map(|c| c.completeness)
    }

    pub fn cached_entity_count(&self) -> usize {
        self.inner.lock().entities.len()
    }

    /// Returns the full entity, fetching it (and, for ways and relations,
    /// everything it references) unless a full copy is cached. Every
    /// element of the response is cached as full.
    pub async fn fetch_entity(&self, entity: EntityRef) -> Result<Entity, FetchError> {
        let fetch = {
            let mut caches = self.inner.lock();
            if let Some(cached) = caches.entities.get(&entity)
                && cached.completeness == Completeness::Full
            {
                debug!("Entity cache hit: {}", entity);
                return Ok(cached.entity.clone());
            }
            caches
                .entity_fetches
                .entry(entity)
                .or_insert_with(|| self.entity_fetch(entity))
                .clone()
        };
        fetch.await
    }

    fn entity_fetch(&self, entity: EntityRef) -> SharedFetch<Entity> {
        let inner = self.inner.clone();
        async move {
            debug!("Fetching {} from {}", entity, inner.source.name());
            let result = inner.source.fetch_elements(entity).await;

            let mut caches = inner.lock();
            caches.entity_fetches.remove(&entity);
            let elements = result?;
            let count = elements.len();
            for element in elements {
                caches.upsert(Entity::from(element), Completeness::Full);
            }
            debug!("Cached {} elements from {} fetch", count, entity);
            caches
                .entities
                .get(&entity)
                .map(|c| c.entity.clone())
                .ok_or(FetchError::NotFound)
        }
        .boxed()
        .shared()
    }

    /// Returns the relations `entity` is a member of, with its role in each.
    /// The relations themselves are cached as partial entities.
    pub async fn fetch_memberships(&self, entity: EntityRef) -> Result<Vec<Membership>, FetchError> {
        let fetch = {
            let mut caches = self.inner.lock();
            if let Some(memberships) = caches.memberships.get(&entity) {
                debug!("Membership cache hit: {}", entity);
                return Ok(memberships.clone());
            }
            caches
                .membership_fetches
                .entry(entity)
                .or_insert_with(|| self.membership_fetch(entity))
                .clone()
        };
        fetch.await
    }

    fn membership_fetch(&self, entity: EntityRef) -> SharedFetch<Vec<Membership>> {
        let inner = self.inner.clone();
        async move {
            debug!("Fetching relations of {} from {}", entity, inner.source.name());
            let result = inner.source.fetch_relations_of(entity).await;

            let mut caches = inner.lock();
            caches.membership_fetches.remove(&entity);
            let relations: Vec<Entity> = result?.into_iter().map(Entity::from).collect();
            let memberships = derive_memberships(entity, &relations);
            for relation in relations {
                caches.upsert(relation, Completeness::Partial);
            }
            caches.memberships.insert(entity, memberships.clone());
            Ok(memberships)
        }
        .boxed()
        .shared()
    }

    pub async fn fetch_changeset(&self, id: i64) -> Result<Changeset, FetchError> {
        let fetch = {
            let mut caches = self.inner.lock();
            if let Some(changeset) = caches.changesets.get(&id) {
                return Ok(changeset.clone());
            }
            caches
                .changeset_fetches
                .entry(id)
                .or_insert_with(|| self.changeset_fetch(id))
                .clone()
        };
        fetch.await
    }

    fn changeset_fetch(&self, id: i64) -> SharedFetch<Changeset> {
        let inner = self.inner.clone();
        async move {
            let result = inner.source.fetch_changeset(id).await;

            let mut caches = inner.lock();
            caches.changeset_fetches.remove(&id);
            let changeset = result?;
            caches.changesets.insert(id, changeset.clone());
            Ok(changeset)
        }
        .boxed()
        .shared()
    }
}

/// One membership per member entry that points at `entity`; a relation
/// listing it twice yields two memberships.
fn derive_memberships(entity: EntityRef, relations: &[Entity]) -> Vec<Membership> {
    relations
        .iter()
        .flat_map(|relation| {
            relation
                .members
                .iter()
                .filter(move |m| m.entity == entity)
                .map(move |m| Membership {
                    relation: relation.reference,
                    role: m.role.clone(),
                })
        })
        .collect()
}
