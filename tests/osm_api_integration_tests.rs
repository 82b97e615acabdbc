use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use trailview::osm::{EntityRef, EntityStore, FetchError, OsmApiClient, OsmSource};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn client(server: &MockServer) -> OsmApiClient {
    OsmApiClient::new(Some(format!("{}/api/0.6", server.uri())))
}

fn store(server: &MockServer) -> EntityStore {
    EntityStore::new(Arc::new(client(server)))
}

/// `GET way/10/full.json`: a way over two nodes, nodes listed first as the
/// API does.
fn way_full_body() -> serde_json::Value {
    json!({
        "version": "0.6",
        "elements": [
            {"type": "node", "id": 1, "lat": 44.0, "lon": -72.0, "version": 2,
             "changeset": 5, "user": "mapper"},
            {"type": "node", "id": 2, "lat": 44.1, "lon": -72.1, "version": 1,
             "changeset": 5, "user": "mapper"},
            {"type": "way", "id": 10, "nodes": [1, 2], "version": 3, "changeset": 77,
             "user": "trailcrew", "timestamp": "2023-05-01T12:00:00Z",
             "tags": {"highway": "path", "foot": "designated"}}
        ]
    })
}

// ============================================================================
// Client Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_full_way_decodes_every_element() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/way/10/full.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(way_full_body()))
        .mount(&server)
        .await;

    let elements = client(&server)
        .fetch_elements(EntityRef::way(10))
        .await
        .unwrap();
    assert_eq!(elements.len(), 3);
    let way = &elements[2];
    assert_eq!(way.id, 10);
    assert_eq!(way.nodes, vec![1, 2]);
    assert_eq!(way.tags.get("foot").map(String::as_str), Some("designated"));
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/node/404.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/node/410.json"))
        .respond_with(ResponseTemplate::new(410).set_body_string("The node has been deleted"))
        .mount(&server)
        .await;

    let client = client(&server);
    for id in [404, 410] {
        let err = client
            .fetch_elements(EntityRef::node(id))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::NotFound);
    }
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/relation/5/full.json"))
        .respond_with(ResponseTemplate::new(509).set_body_string("Bandwidth limit exceeded"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_elements(EntityRef::relation(5))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::Api {
            status: 509,
            message: "Bandwidth limit exceeded".to_string()
        }
    );
}

#[tokio::test]
async fn test_garbage_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/way/10/relations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<osm>not json</osm>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_relations_of(EntityRef::way(10))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 1
    let base = "http://127.0.0.1:1/api/0.6".to_string();
    let err = OsmApiClient::with_options(Some(base), "trailview-test", 2)
        .fetch_changeset(1)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_changeset_accepts_both_response_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/changeset/77.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [{"type": "changeset", "id": 77, "user": "trailcrew",
                          "tags": {"comment": "Add ridge trail"}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/changeset/78.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "changeset": {"id": 78, "user": "trailcrew", "tags": {}}
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let old = client.fetch_changeset(77).await.unwrap();
    assert_eq!(old.comment(), Some("Add ridge trail"));
    let new = client.fetch_changeset(78).await.unwrap();
    assert_eq!(new.id, 78);
    assert_eq!(new.comment(), None);
}

// ============================================================================
// Entity Store Tests (over HTTP)
// ============================================================================

#[tokio::test]
async fn test_concurrent_fetches_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/way/10/full.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(way_full_body())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let (a, b) = tokio::join!(
        store.fetch_entity(EntityRef::way(10)),
        store.fetch_entity(EntityRef::way(10))
    );
    assert_eq!(a.unwrap(), b.unwrap());

    // Served from cache from here on, including the nodes of the way
    let way = store.fetch_entity(EntityRef::way(10)).await.unwrap();
    assert_eq!(way.version, 3);
    let node = store.fetch_entity(EntityRef::node(2)).await.unwrap();
    assert_eq!(node.changeset, 5);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/way/10/full.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/way/10/full.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(way_full_body()))
        .mount(&server)
        .await;

    let store = store(&server);
    let first = store.fetch_entity(EntityRef::way(10)).await;
    assert!(matches!(first, Err(FetchError::Api { status: 503, .. })));
    assert!(store.cached(EntityRef::way(10)).is_none());

    let second = store.fetch_entity(EntityRef::way(10)).await.unwrap();
    assert_eq!(second.user, "trailcrew");
}

#[tokio::test]
async fn test_memberships_cache_relations_as_partial() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0.6/way/10/relations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {"type": "relation", "id": 500, "version": 4, "changeset": 9, "user": "a",
                 "tags": {"type": "route", "route": "hiking", "name": "Ridge Trail"},
                 "members": [
                     {"type": "way", "ref": 9, "role": ""},
                     {"type": "way", "ref": 10, "role": "forward"}
                 ]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let memberships = store.fetch_memberships(EntityRef::way(10)).await.unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].relation, EntityRef::relation(500));
    assert_eq!(memberships[0].role, "forward");

    let relation = store.cached(EntityRef::relation(500)).unwrap();
    assert_eq!(relation.tags.get("name").map(String::as_str), Some("Ridge Trail"));
    assert_eq!(
        store.completeness(EntityRef::relation(500)),
        Some(trailview::osm::Completeness::Partial)
    );

    // Second lookup is a cache hit (the mock expects exactly one request)
    store.fetch_memberships(EntityRef::way(10)).await.unwrap();
}
