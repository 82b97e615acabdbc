//! # Selection
//!
//! Selected and hovered entity, and which features to highlight for them.
//!
//! Hover is independent of selection except for one rule: an entity that
//! is selected is never also drawn as hovered.

use crate::map::LngLat;
use crate::map::filters::Highlight;
use crate::osm::{Entity, EntityRef, EntityType};

/// Relation nesting followed when highlighting members: the selected
/// relation is depth 1, its child relations depth 2, and nothing deeper.
pub const MAX_EXPANSION_DEPTH: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionState {
    pub selected: Option<EntityRef>,
    /// Where the selecting click landed, when known.
    pub focus: Option<LngLat>,
    pub hovered: Option<EntityRef>,
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        self.selected.is_none()
    }

    /// Returns `false` (and changes nothing) when `target` is already
    /// selected.
    pub fn select(&mut self, target: Option<EntityRef>, focus: Option<LngLat>) -> bool {
        if self.selected == target {
            return false;
        }
        self.selected = target;
        self.focus = focus;
        self.clear_hover_if_selected();
        true
    }

    /// Returns whether the hovered entity changed.
    pub fn hover(&mut self, target: Option<EntityRef>) -> bool {
        let before = self.hovered;
        self.hovered = target;
        self.clear_hover_if_selected();
        self.hovered != before
    }

    fn clear_hover_if_selected(&mut self) {
        if self.hovered.is_some() && self.hovered == self.selected {
            self.hovered = None;
        }
    }
}

/// Ids to highlight for `selected`. A selected relation highlights its
/// member ways and nodes, looked up with `cached`; child relations are
/// followed only when already cached, down to `MAX_EXPANSION_DEPTH`.
pub fn highlight_for<F>(selected: Option<EntityRef>, cached: F) -> Highlight
where
    F: Fn(EntityRef) -> Option<Entity>,
{
    let mut highlight = Highlight::default();
    match selected {
        None => {}
        Some(EntityRef { kind: EntityType::Way, id }) => {
            highlight.ways.insert(id);
        }
        Some(EntityRef { kind: EntityType::Node, id }) => {
            highlight.nodes.insert(id);
        }
        Some(relation) => expand_relation(relation, 1, &cached, &mut highlight),
    }
    highlight
}

fn expand_relation<F>(relation: EntityRef, depth: usize, cached: &F, out: &mut Highlight)
where
    F: Fn(EntityRef) -> Option<Entity>,
{
    let Some(entity) = cached(relation) else {
        return;
    };
    for member in &entity.members {
        match member.entity.kind {
            EntityType::Way => {
                out.ways.insert(member.entity.id);
            }
            EntityType::Node => {
                out.nodes.insert(member.entity.id);
            }
            EntityType::Relation if depth < MAX_EXPANSION_DEPTH => {
                expand_relation(member.entity, depth + 1, cached, out);
            }
            EntityType::Relation => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::Member;
    use std::collections::{BTreeSet, HashMap};

    fn relation(id: i64, members: &[EntityRef]) -> Entity {
        Entity {
            reference: EntityRef::relation(id),
            version: 1,
            timestamp: None,
            changeset: 1,
            user: String::new(),
            tags: Default::default(),
            members: members
                .iter()
                .map(|m| Member { entity: *m, role: String::new() })
                .collect(),
        }
    }

    fn cache(entities: Vec<Entity>) -> HashMap<EntityRef, Entity> {
        entities.into_iter().map(|e| (e.reference, e)).collect()
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut state = SelectionState::default();
        assert!(!state.select(None, None));
        assert!(state.select(Some(EntityRef::way(1)), None));
        assert!(!state.select(Some(EntityRef::way(1)), None));
        assert!(state.select(Some(EntityRef::node(1)), None));
    }

    #[test]
    fn test_hover_on_selection_is_cleared() {
        let mut state = SelectionState::default();
        state.select(Some(EntityRef::way(1)), None);
        state.hover(Some(EntityRef::way(1)));
        assert_eq!(state.hovered, None);

        state.hover(Some(EntityRef::way(2)));
        assert_eq!(state.hovered, Some(EntityRef::way(2)));
        state.select(Some(EntityRef::way(2)), None);
        assert_eq!(state.hovered, None);
    }

    #[test]
    fn test_way_and_node_highlight_themselves() {
        let h = highlight_for(Some(EntityRef::way(5)), |_| None);
        assert_eq!(h.ways, BTreeSet::from([5]));
        assert!(h.nodes.is_empty());
        let h = highlight_for(Some(EntityRef::node(6)), |_| None);
        assert_eq!(h.nodes, BTreeSet::from([6]));
        assert!(highlight_for(None, |_| None).is_empty());
    }

    #[test]
    fn test_relation_expands_cached_child_relation() {
        let entities = cache(vec![
            relation(1, &[EntityRef::way(10), EntityRef::way(11), EntityRef::relation(2)]),
            relation(2, &[EntityRef::way(20)]),
        ]);
        let h = highlight_for(Some(EntityRef::relation(1)), |r| entities.get(&r).cloned());
        assert_eq!(h.ways, BTreeSet::from([10, 11, 20]));
        assert!(h.nodes.is_empty());
    }

    #[test]
    fn test_uncached_relation_highlights_nothing() {
        let h = highlight_for(Some(EntityRef::relation(1)), |_| None);
        assert!(h.is_empty());
    }

    #[test]
    fn test_uncached_child_relation_is_skipped() {
        let entities = cache(vec![relation(1, &[EntityRef::node(3), EntityRef::relation(2)])]);
        let h = highlight_for(Some(EntityRef::relation(1)), |r| entities.get(&r).cloned());
        assert_eq!(h.nodes, BTreeSet::from([3]));
        assert!(h.ways.is_empty());
    }

    #[test]
    fn test_grandchild_relations_are_not_expanded() {
        let entities = cache(vec![
            relation(1, &[EntityRef::relation(2)]),
            relation(2, &[EntityRef::way(20), EntityRef::relation(3)]),
            relation(3, &[EntityRef::way(30)]),
        ]);
        let h = highlight_for(Some(EntityRef::relation(1)), |r| entities.get(&r).cloned());
        assert_eq!(h.ways, BTreeSet::from([20]));
    }

    #[test]
    fn test_self_referencing_relations_terminate() {
        let entities = cache(vec![
            relation(1, &[EntityRef::relation(1), EntityRef::relation(2), EntityRef::way(10)]),
            relation(2, &[EntityRef::relation(1), EntityRef::way(20)]),
        ]);
        let h = highlight_for(Some(EntityRef::relation(1)), |r| entities.get(&r).cloned());
        assert_eq!(h.ways, BTreeSet::from([10, 20]));
    }
}
