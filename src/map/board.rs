use std::collections::BTreeMap;

use serde_json::Value;

use super::{LayerId, MapEngine};

/// An in-memory engine: remembers the current filter of every layer.
/// Receives the filters in the terminal front-end and the tests.
#[derive(Debug, Default, Clone)]
pub struct LayerBoard {
    filters: BTreeMap<LayerId, Value>,
    updates: usize,
}

impl LayerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self, layer: LayerId) -> Option<&Value> {
        self.filters.get(&layer)
    }

    /// Total number of `set_filter` calls received.
    pub fn update_count(&self) -> usize {
        self.updates
    }
}

impl MapEngine for LayerBoard {
    fn set_filter(&mut self, layer: LayerId, filter: Value) {
        self.updates += 1;
        self.filters.insert(layer, filter);
    }
}
