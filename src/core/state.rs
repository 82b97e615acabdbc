//! # Session State
//!
//! Everything one viewer session owns, in one place. No globals: the
//! event loop owns a `Session` and changes it only through
//! `update(session, action)` in action.rs.
//!
//! ```text
//! Session<E: MapEngine>
//! ├── store: EntityStore          // shared with background fetch tasks
//! ├── engine: E                   // receives layer filters
//! ├── filters: FilterCompiler     // holds filters until layers are ready
//! ├── mode: TravelMode            // active travel mode
//! ├── predicates: CategoryPredicates
//! ├── selection: SelectionState   // selected / hovered entity
//! ├── fragment: Fragment          // persisted `#key=value` state
//! ├── sidebar: Sidebar            // tables for the selected entity
//! ├── status_message: String      // status bar text
//! └── generation: u64             // bumped on every selection change
//! ```

use crate::access::{CategoryPredicates, TravelMode, classify};
use crate::core::fragment::Fragment;
use crate::core::selection::{SelectionState, highlight_for};
use crate::core::sidebar::Sidebar;
use crate::map::MapEngine;
use crate::map::filters::{FilterCompiler, Highlight};
use crate::osm::EntityStore;

pub struct Session<E: MapEngine> {
    pub store: EntityStore,
    pub(crate) engine: E,
    pub(crate) filters: FilterCompiler,
    pub mode: TravelMode,
    pub predicates: CategoryPredicates,
    pub selection: SelectionState,
    pub fragment: Fragment,
    pub sidebar: Sidebar,
    pub status_message: String,
    generation: u64,
}

impl<E: MapEngine> Session<E> {
    /// Starts a session in `mode`. The access filters are queued right
    /// away and reach the engine once its layers are ready.
    pub fn new(store: EntityStore, engine: E, mode: TravelMode) -> Self {
        let predicates = classify(mode);
        let mut filters = FilterCompiler::new();
        let mut engine = engine;
        filters.apply_access(&mut engine, &predicates);
        filters.apply_selection(&mut engine, &Highlight::default());
        filters.apply_hover(&mut engine, None);
        Self {
            store,
            engine,
            filters,
            mode,
            predicates,
            selection: SelectionState::default(),
            fragment: Fragment::default(),
            sidebar: Sidebar::default(),
            status_message: format!("Mode: {}", mode),
            generation: 0,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn filters(&self) -> &FilterCompiler {
        &self.filters
    }

    /// Identifies the current selection's fetches; results tagged with
    /// an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Highlight for the current selection, from whatever is cached now.
    pub fn highlight(&self) -> Highlight {
        highlight_for(self.selection.selected, |r| self.store.cached(r))
    }

    pub(crate) fn push_selection_filters(&mut self) {
        let highlight = self.highlight();
        self.filters.apply_selection(&mut self.engine, &highlight);
        self.filters.apply_hover(&mut self.engine, self.selection.hovered);
    }

    pub(crate) fn push_hover_filter(&mut self) {
        self.filters.apply_hover(&mut self.engine, self.selection.hovered);
    }

    pub(crate) fn push_access_filters(&mut self) {
        self.filters.apply_access(&mut self.engine, &self.predicates);
    }

    pub(crate) fn layers_ready(&mut self) {
        self.filters.layers_ready(&mut self.engine);
    }
}
