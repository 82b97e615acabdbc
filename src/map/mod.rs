//! # Rendering Engine Boundary
//!
//! The map renderer is an external collaborator. This module names its
//! layers, describes the pointer events it emits, and defines the one
//! operation the core needs from it: replacing a layer's filter.
//!
//! - [`filters`]: `FilterCompiler`, which lowers predicates and highlight
//!   sets into layer filters
//! - [`board`]: `LayerBoard`, an in-memory engine that keeps the current
//!   filter of every layer

pub mod board;
pub mod filters;

use std::fmt;

use serde_json::Value;

use crate::access::Category;
use crate::osm::{EntityRef, EntityType};

/// Source layer holding trail lines.
pub const TRAIL_SOURCE_LAYER: &str = "trail";
/// Source layer holding trail points of interest (trailheads, ranger stations).
pub const POI_SOURCE_LAYER: &str = "trail_poi";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    HoveredPaths,
    HoveredPois,
    SelectedPaths,
    SelectedPois,
    InformalPaths,
    DisallowedInformalPaths,
    UnspecifiedInformalPaths,
    DisallowedPaths,
    UnspecifiedPaths,
    Paths,
}

impl LayerId {
    /// Every filtered layer, bottom to top as the style stacks them.
    pub const ALL: [LayerId; 10] = [
        LayerId::HoveredPaths,
        LayerId::HoveredPois,
        LayerId::SelectedPaths,
        LayerId::SelectedPois,
        LayerId::InformalPaths,
        LayerId::DisallowedInformalPaths,
        LayerId::UnspecifiedInformalPaths,
        LayerId::DisallowedPaths,
        LayerId::UnspecifiedPaths,
        LayerId::Paths,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerId::HoveredPaths => "hovered-paths",
            LayerId::HoveredPois => "hovered-pois",
            LayerId::SelectedPaths => "selected-paths",
            LayerId::SelectedPois => "selected-pois",
            LayerId::InformalPaths => "informal-paths",
            LayerId::DisallowedInformalPaths => "disallowed-informal-paths",
            LayerId::UnspecifiedInformalPaths => "unspecified-informal-paths",
            LayerId::DisallowedPaths => "disallowed-paths",
            LayerId::UnspecifiedPaths => "unspecified-paths",
            LayerId::Paths => "paths",
        }
    }

    pub fn source_layer(self) -> &'static str {
        match self {
            LayerId::HoveredPois | LayerId::SelectedPois => POI_SOURCE_LAYER,
            _ => TRAIL_SOURCE_LAYER,
        }
    }

    /// The layer that renders segments of `category`.
    pub fn for_category(category: Category) -> LayerId {
        match category {
            Category::AllowedFormal => LayerId::Paths,
            Category::DisallowedFormal => LayerId::DisallowedPaths,
            Category::UnspecifiedFormal => LayerId::UnspecifiedPaths,
            Category::AllowedInformal => LayerId::InformalPaths,
            Category::DisallowedInformal => LayerId::DisallowedInformalPaths,
            Category::UnspecifiedInformal => LayerId::UnspecifiedInformalPaths,
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The renderer, as far as the core is concerned.
pub trait MapEngine {
    /// Replaces the filter of `layer`.
    fn set_filter(&mut self, layer: LayerId, filter: Value);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

/// A rendered feature under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// The `OSM_ID` property.
    pub osm_id: Option<i64>,
    pub source_layer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
    Click,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEvent {
    pub kind: PointerKind,
    pub features: Vec<Feature>,
    pub lng_lat: Option<LngLat>,
}

/// Maps the first feature of an event to the entity it was rendered from.
/// POI layers hold nodes; everything else holds ways.
pub fn entity_for_event(event: &MapEvent) -> Option<EntityRef> {
    let feature = event.features.first()?;
    let id = feature.osm_id.filter(|id| *id != 0)?;
    let kind = if feature.source_layer.contains("poi") {
        EntityType::Node
    } else {
        EntityType::Way
    };
    Some(EntityRef::new(kind, id))
}
