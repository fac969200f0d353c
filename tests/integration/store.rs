use crate::*;

use std::time::Duration;

use serde_json::json;
use tilebridge_core::ChunkId;
use tilebridge_services::FetchError;

/// 2xx with a JSON body comes back unchanged.
#[tokio::test]
async fn test_hit_returns_payload() {
    let store = TestStore::start().await.unwrap();
    let payload = json!({ "tiles": [1, 2, 3] });
    store.put_json("map/(2, -1).json", &payload).unwrap();

    let result = store.client().resolve(&ChunkId::axial(2, -1)).await;
    assert_eq!(result.unwrap(), payload);
}

/// Missing file is a 404 status failure.
#[tokio::test]
async fn test_missing_chunk_is_not_found() {
    let store = TestStore::start().await.unwrap();

    let err = store
        .client()
        .resolve(&ChunkId::axial(5, 5))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected 404, got {err}");
}

/// A near-miss file name is still a miss: the name must match exactly.
#[tokio::test]
async fn test_file_name_must_match_exactly() {
    let store = TestStore::start().await.unwrap();
    store.put("map/(3,-2).json", "[]").unwrap();
    store.put("map/(3, -2) .json", "[]").unwrap();

    let err = store
        .client()
        .resolve(&ChunkId::axial(3, -2))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

/// 2xx with a body that is not JSON is a malformed failure.
#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let store = TestStore::start().await.unwrap();
    store.put("map/(1, 1).json", "{ not json").unwrap();
    store.put("map/(1, 2).json", "").unwrap();

    let client = store.client();
    for id in [ChunkId::axial(1, 1), ChunkId::axial(1, 2)] {
        let err = client.resolve(&id).await.unwrap_err();
        assert!(
            matches!(err, FetchError::Malformed(_)),
            "{id}: expected malformed, got {err}"
        );
    }
}

/// Non-404 failure statuses are status failures too.
#[tokio::test]
async fn test_server_error_is_status_failure() {
    let (addr, server) = status_server(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    let layout = StoreLayout::new(&format!("http://{addr}/"), "map", None).unwrap();
    let client = ChunkStoreClient::new(layout, None).unwrap();

    match client.resolve(&ChunkId::axial(0, 0)).await {
        Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status failure, got {other:?}"),
    }
    server.abort();
}

/// Nothing listening is a transport failure, not a panic.
#[tokio::test]
async fn test_unreachable_store_is_transport_failure() {
    let addr = dead_addr().await.unwrap();
    let layout = StoreLayout::new(&format!("http://{addr}/"), "map", None).unwrap();
    let client = ChunkStoreClient::new(layout, Some(Duration::from_secs(5))).unwrap();

    let err = client.resolve(&ChunkId::axial(0, 0)).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err}");
}

/// Map selection adds a directory level; tokens map to `{token}.json`.
#[tokio::test]
async fn test_map_directory_and_tokens() {
    let store = TestStore::start().await.unwrap();
    store.put_json("map/forest/(0, 1).json", &json!("forest")).unwrap();
    store.put_json("map/forest/12.json", &json!("token")).unwrap();
    store.put_json("map/(0, 1).json", &json!("root")).unwrap();

    let client = ChunkStoreClient::new(store.layout(Some("forest")), None).unwrap();
    assert_eq!(client.resolve(&ChunkId::axial(0, 1)).await.unwrap(), json!("forest"));
    assert_eq!(
        client
            .resolve(&ChunkId::token("12").unwrap())
            .await
            .unwrap(),
        json!("token")
    );

    assert_eq!(
        store.client().resolve(&ChunkId::axial(0, 1)).await.unwrap(),
        json!("root")
    );
}
