//! # Selection Resolution
//!
//! The I/O half of `Effect::Resolve`: fetches the selected entity (then
//! its changeset) and its relation memberships concurrently, and reports
//! each result back to the event loop as an `Action`.

use std::sync::mpsc;

use log::{debug, warn};

use crate::core::action::Action;
use crate::osm::{EntityRef, EntityStore};

pub async fn resolve_selection(
    store: EntityStore,
    generation: u64,
    target: EntityRef,
    tx: mpsc::Sender<Action>,
) {
    debug!("Resolving {} (generation {})", target, generation);

    let entity_path = {
        let store = store.clone();
        let tx = tx.clone();
        async move {
            let result = store.fetch_entity(target).await;
            let changeset = result.as_ref().ok().map(|entity| entity.changeset);
            send(
                &tx,
                Action::EntityResolved {
                    generation,
                    target,
                    result,
                },
            );
            if let Some(id) = changeset {
                let result = store.fetch_changeset(id).await;
                send(&tx, Action::ChangesetResolved { generation, result });
            }
        }
    };

    let membership_path = async move {
        let result = store.fetch_memberships(target).await;
        send(
            &tx,
            Action::MembershipsResolved {
                generation,
                target,
                result,
            },
        );
    };

    tokio::join!(entity_path, membership_path);
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to deliver resolution result: receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{EntityType, FetchError};
    use crate::test_support::{FakeSource, wire_relation, wire_way};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_resolve_reports_entity_changeset_and_memberships() {
        let way = EntityRef::way(10);
        let source = FakeSource::new()
            .with_elements(way, vec![wire_way(10, &[], &[("highway", "path")])])
            .with_relations(way, vec![wire_relation(1, &[(EntityType::Way, 10, "")], &[])])
            .with_changeset(1, "mapper", Some("trail work"));
        let store = EntityStore::new(Arc::new(source));
        let (tx, rx) = mpsc::channel();

        resolve_selection(store, 3, way, tx).await;
        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(actions.len(), 3);
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::EntityResolved { generation: 3, result: Ok(_), .. }
        )));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::ChangesetResolved { generation: 3, result: Ok(cs) } if cs.comment() == Some("trail work")
        )));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::MembershipsResolved { generation: 3, result: Ok(m), .. } if m.len() == 1
        )));
    }

    #[tokio::test]
    async fn test_missing_entity_skips_changeset() {
        let store = EntityStore::new(Arc::new(FakeSource::new()));
        let (tx, rx) = mpsc::channel();

        resolve_selection(store, 1, EntityRef::node(5), tx).await;
        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::EntityResolved { result: Err(FetchError::NotFound), .. }
        )));
        assert!(!actions.iter().any(|a| matches!(a, Action::ChangesetResolved { .. })));
    }
}
