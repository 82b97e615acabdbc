//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User clicks a trail? That's `Action::Pointer(event)`.
//! The OSM API answers? That's `Action::EntityResolved { .. }`.
//!
//! `update()` applies an action to the session and returns the effects
//! the runtime must carry out. Filters are pushed to the engine here,
//! synchronously; fetching and fragment writes happen elsewhere.
//!
//! ```text
//! Session + Action  →  update()  →  Session' + [Effect]
//! ```
//!
//! Fetch results carry the generation that was current when the fetch
//! was started. Results from an older generation are dropped.

use log::{debug, info, warn};

use crate::access::{TravelMode, classify};
use crate::core::fragment::{Fragment, SELECTED_KEY, STYLE_KEY};
use crate::core::sidebar::Sidebar;
use crate::core::state::Session;
use crate::map::{LngLat, MapEngine, MapEvent, PointerKind, entity_for_event};
use crate::osm::{Changeset, Entity, EntityRef, FetchError, Membership};

#[derive(Debug, Clone)]
pub enum Action {
    /// Select an entity, or clear the selection with `None`.
    Select {
        target: Option<EntityRef>,
        focus: Option<LngLat>,
    },
    Hover(Option<EntityRef>),
    /// Switch travel mode; `None` means the default mode.
    SetMode(Option<TravelMode>),
    CycleMode,
    /// The engine has registered its layers.
    LayersReady,
    /// The URL fragment changed underneath us (initial load, navigation).
    FragmentChanged(String),
    Pointer(MapEvent),
    EntityResolved {
        generation: u64,
        target: EntityRef,
        result: Result<Entity, FetchError>,
    },
    ChangesetResolved {
        generation: u64,
        result: Result<Changeset, FetchError>,
    },
    MembershipsResolved {
        generation: u64,
        target: EntityRef,
        result: Result<Vec<Membership>, FetchError>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the entity, its changeset and its memberships, reporting
    /// back with actions tagged with `generation`.
    Resolve { generation: u64, target: EntityRef },
    /// Replace the URL fragment with this text.
    WriteFragment(String),
    Quit,
}

pub fn update<E: MapEngine>(session: &mut Session<E>, action: Action) -> Vec<Effect> {
    match action {
        Action::Select { target, focus } => select(session, target, focus),
        Action::Hover(target) => {
            hover(session, target);
            Vec::new()
        }
        Action::SetMode(mode) => set_mode(session, mode.unwrap_or_default()),
        Action::CycleMode => {
            let next = session.mode.next();
            set_mode(session, next)
        }
        Action::LayersReady => {
            session.layers_ready();
            Vec::new()
        }
        Action::FragmentChanged(text) => fragment_changed(session, &text),
        Action::Pointer(event) => pointer(session, &event),
        Action::EntityResolved {
            generation,
            target,
            result,
        } => {
            if !is_current(session, generation, "entity") {
                return Vec::new();
            }
            if let Err(ref e) = result {
                warn!("Failed to resolve {}: {}", target, e);
                session.status_message = format!("{}: {}", target, e);
            }
            session.sidebar.set_entity(&result);
            // A relation's members are only known once it is cached.
            session.push_selection_filters();
            Vec::new()
        }
        Action::ChangesetResolved { generation, result } => {
            if is_current(session, generation, "changeset") {
                session.sidebar.set_changeset(&result);
            }
            Vec::new()
        }
        Action::MembershipsResolved {
            generation,
            target,
            result,
        } => {
            if !is_current(session, generation, "memberships") {
                return Vec::new();
            }
            if let Err(ref e) = result {
                warn!("Failed to resolve memberships of {}: {}", target, e);
            }
            session.sidebar.set_memberships(&result, &session.store);
            Vec::new()
        }
        Action::Quit => vec![Effect::Quit],
    }
}

fn is_current<E: MapEngine>(session: &Session<E>, generation: u64, what: &str) -> bool {
    if generation == session.generation() {
        return true;
    }
    debug!(
        "Dropping stale {} result (generation {}, current {})",
        what,
        generation,
        session.generation()
    );
    false
}

fn select<E: MapEngine>(
    session: &mut Session<E>,
    target: Option<EntityRef>,
    focus: Option<LngLat>,
) -> Vec<Effect> {
    if !session.selection.select(target, focus) {
        debug!("Selection unchanged");
        return Vec::new();
    }
    let generation = session.next_generation();
    session.push_selection_filters();

    let mut effects = write_fragment(session, SELECTED_KEY, target.map(|t| t.to_string()));
    match target {
        Some(target) => {
            info!("Selected {} (generation {})", target, generation);
            session.sidebar = Sidebar::loading(target, focus);
            session.status_message = format!("Selected {}", target);
            effects.push(Effect::Resolve { generation, target });
        }
        None => {
            info!("Selection cleared");
            session.sidebar = Sidebar::default();
            session.status_message = String::from("Selection cleared");
        }
    }
    effects
}

fn hover<E: MapEngine>(session: &mut Session<E>, target: Option<EntityRef>) {
    if session.selection.hover(target) {
        session.push_hover_filter();
    }
}

fn set_mode<E: MapEngine>(session: &mut Session<E>, mode: TravelMode) -> Vec<Effect> {
    if session.mode == mode {
        return Vec::new();
    }
    info!("Travel mode {} -> {}", session.mode, mode);
    session.mode = mode;
    session.predicates = classify(mode);
    session.push_access_filters();
    session.status_message = format!("Mode: {}", mode);

    write_fragment(session, STYLE_KEY, style_value(mode))
}

/// A fragment without `selected` clears the selection and one without
/// `style` restores the default mode, mirroring how both are written.
/// Values that do not parse are ignored, and the fragment is rewritten
/// from the state they failed to replace.
fn fragment_changed<E: MapEngine>(session: &mut Session<E>, text: &str) -> Vec<Effect> {
    let incoming = Fragment::parse(text);
    session.fragment = incoming.clone();

    let mut effects = Vec::new();
    let mut repaired = false;
    match (incoming.get(STYLE_KEY), incoming.style()) {
        (None, _) => effects.extend(set_mode(session, TravelMode::default())),
        (Some(_), Some(mode)) => effects.extend(set_mode(session, mode)),
        (Some(_), None) => {
            session.fragment.set(STYLE_KEY, style_value(session.mode));
            repaired = true;
        }
    }
    match (incoming.get(SELECTED_KEY), incoming.selected()) {
        (None, _) => effects.extend(select(session, None, None)),
        (Some(_), Some(target)) => effects.extend(select(session, Some(target), None)),
        (Some(_), None) => {
            let current = session.selection.selected.map(|t| t.to_string());
            session.fragment.set(SELECTED_KEY, current);
            repaired = true;
        }
    }

    if repaired {
        // Any write above already carries the repaired text.
        effects.retain(|e| !matches!(e, Effect::WriteFragment(_)));
        let after = session.fragment.to_string();
        if after != incoming.to_string() {
            debug!("Rewriting fragment after ignored values: {}", after);
            effects.push(Effect::WriteFragment(after));
        }
    }
    effects
}

/// `style` value for `mode`; the default mode is written as no key.
fn style_value(mode: TravelMode) -> Option<String> {
    (mode != TravelMode::default()).then(|| mode.name().to_string())
}

fn pointer<E: MapEngine>(session: &mut Session<E>, event: &MapEvent) -> Vec<Effect> {
    let target = entity_for_event(event);
    match event.kind {
        PointerKind::Enter => {
            hover(session, target);
            Vec::new()
        }
        PointerKind::Leave => {
            hover(session, None);
            Vec::new()
        }
        PointerKind::Click => select(session, target, event.lng_lat),
    }
}

/// Writes `key` into the fragment; returns the write effect only when the
/// serialized fragment actually changed.
fn write_fragment<E: MapEngine>(
    session: &mut Session<E>,
    key: &str,
    value: Option<String>,
) -> Vec<Effect> {
    let before = session.fragment.to_string();
    session.fragment.set(key, value);
    let after = session.fragment.to_string();
    if after == before {
        Vec::new()
    } else {
        vec![Effect::WriteFragment(after)]
    }
}
