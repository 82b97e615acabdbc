//! # Filter Compiler
//!
//! Pushes layer filters to the engine: the six access categories on every
//! mode change, and the selection/hover highlights on every state change.
//!
//! Until the engine has registered its layers, filters are held back
//! (latest per layer wins) and flushed once `layers_ready` is called.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde_json::{Value, json};

use super::{LayerId, MapEngine};
use crate::access::{Category, CategoryPredicates};
use crate::osm::{EntityRef, EntityType};

/// Feature property holding the OSM id.
pub const OSM_ID_PROPERTY: &str = "OSM_ID";

/// Matches no feature; OSM ids are positive.
const NO_FEATURE: i64 = -1;

/// Way and node ids to draw as highlighted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    pub ways: BTreeSet<i64>,
    pub nodes: BTreeSet<i64>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.ways.is_empty() && self.nodes.is_empty()
    }
}

fn membership_filter(ids: &BTreeSet<i64>) -> Value {
    let mut items = vec![json!("in"), json!(OSM_ID_PROPERTY)];
    if ids.is_empty() {
        items.push(json!(NO_FEATURE));
    } else {
        items.extend(ids.iter().map(|id| json!(id)));
    }
    Value::Array(items)
}

fn single_filter(id: Option<i64>) -> Value {
    json!(["==", OSM_ID_PROPERTY, id.unwrap_or(NO_FEATURE)])
}

#[derive(Debug, Default)]
pub struct FilterCompiler {
    ready: bool,
    pending: BTreeMap<LayerId, Value>,
    applied: BTreeMap<LayerId, Value>,
}

impl FilterCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The newest filter for `layer`, whether applied or still held back.
    pub fn current(&self, layer: LayerId) -> Option<&Value> {
        self.pending.get(&layer).or_else(|| self.applied.get(&layer))
    }

    fn push<E: MapEngine + ?Sized>(&mut self, engine: &mut E, layer: LayerId, filter: Value) {
        if self.ready {
            engine.set_filter(layer, filter.clone());
            self.applied.insert(layer, filter);
        } else {
            self.pending.insert(layer, filter);
        }
    }

    /// Marks the engine's layers as registered and flushes held filters.
    pub fn layers_ready<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        if self.ready {
            return;
        }
        self.ready = true;
        let pending = std::mem::take(&mut self.pending);
        debug!("Layers ready, flushing {} held filters", pending.len());
        for (layer, filter) in pending {
            self.push(engine, layer, filter);
        }
    }

    /// Applies the six category predicates to their layers.
    pub fn apply_access<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        predicates: &CategoryPredicates,
    ) {
        debug!("Applying access filters for mode {}", predicates.mode);
        for category in Category::ALL {
            let filter = predicates.get(category).to_filter();
            self.push(engine, LayerId::for_category(category), filter);
        }
    }

    pub fn apply_selection<E: MapEngine + ?Sized>(&mut self, engine: &mut E, highlight: &Highlight) {
        self.push(engine, LayerId::SelectedPaths, membership_filter(&highlight.ways));
        self.push(engine, LayerId::SelectedPois, membership_filter(&highlight.nodes));
    }

    pub fn apply_hover<E: MapEngine + ?Sized>(&mut self, engine: &mut E, hovered: Option<EntityRef>) {
        let id_of = |kind: EntityType| hovered.filter(|h| h.kind == kind).map(|h| h.id);
        self.push(engine, LayerId::HoveredPaths, single_filter(id_of(EntityType::Way)));
        self.push(engine, LayerId::HoveredPois, single_filter(id_of(EntityType::Node)));
    }
}
