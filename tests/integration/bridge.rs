use crate::*;

use std::collections::HashMap;

use serde_json::{json, Value};
use tilebridge_core::{Addressing, AxialChunk, ChunkReceived, RequestChunk};
use tilebridge_services::{runtime_port, Bridge, BridgeStats};

/// Issue every request, close the request side, and collect all responses.
async fn run_requests(
    client: ChunkStoreClient,
    addressing: Addressing,
    requests: Vec<RequestChunk>,
) -> (Vec<ChunkReceived>, BridgeStats) {
    let (port, handle) = runtime_port(8);
    let task = tokio::spawn(Bridge::new(client, addressing).run(port));

    for request in requests {
        handle.request(request).await.unwrap();
    }
    let mut responses = handle.finish();

    let mut received = Vec::new();
    while let Some(event) = responses.recv().await {
        received.push(event);
    }
    (received, task.await.unwrap())
}

fn axial_chunks(events: Vec<ChunkReceived>) -> Vec<AxialChunk> {
    events
        .into_iter()
        .map(|event| match event {
            ChunkReceived::Axial(chunk) => chunk,
            ChunkReceived::Raw(v) => panic!("axial bridge emitted raw payload {v}"),
        })
        .collect()
}

/// (2, -1) exists and (5, 5) does not: one payload, one null.
#[tokio::test]
async fn test_bridge_hit_and_miss() {
    let store = TestStore::start().await.unwrap();
    store
        .put_json("map/(2, -1).json", &json!({ "tiles": [1, 2, 3] }))
        .unwrap();

    let (events, stats) = run_requests(
        store.client(),
        Addressing::Axial,
        vec![RequestChunk::axial(2, -1), RequestChunk::axial(5, 5)],
    )
    .await;

    let mut chunks = axial_chunks(events);
    chunks.sort_by_key(|c| (c.q, c.r));
    assert_eq!(
        chunks,
        vec![
            AxialChunk { q: 2, r: -1, tiles: json!({ "tiles": [1, 2, 3] }) },
            AxialChunk { q: 5, r: 5, tiles: Value::Null },
        ]
    );
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.answered, 2);
}

/// Many concurrent requests over a ring of chunks, some present, some
/// missing, some broken. Each gets exactly one correct answer.
#[tokio::test]
async fn test_bridge_concurrent_requests_answered_once() {
    let store = TestStore::start().await.unwrap();
    let mut expected: HashMap<(i32, i32), Value> = HashMap::new();

    for q in -4i32..=4 {
        for r in -4..=4 {
            let tiles = match (q + r).rem_euclid(3) {
                0 => {
                    let tiles = json!({ "q": q, "r": r, "tiles": [q * r] });
                    store.put_json(&format!("map/({q}, {r}).json"), &tiles).unwrap();
                    tiles
                }
                1 => {
                    store.put(&format!("map/({q}, {r}).json"), "<html>").unwrap();
                    Value::Null
                }
                _ => Value::Null,
            };
            expected.insert((q, r), tiles);
        }
    }

    let requests = expected
        .keys()
        .map(|&(q, r)| RequestChunk::axial(q, r))
        .collect();
    let (events, stats) = run_requests(store.client(), Addressing::Axial, requests).await;

    let chunks = axial_chunks(events);
    assert_eq!(chunks.len(), expected.len());

    let mut seen: HashMap<(i32, i32), usize> = HashMap::new();
    for chunk in chunks {
        assert_eq!(
            Some(&chunk.tiles),
            expected.get(&(chunk.q, chunk.r)),
            "wrong tiles for ({}, {})",
            chunk.q,
            chunk.r
        );
        *seen.entry((chunk.q, chunk.r)).or_default() += 1;
    }
    assert!(seen.values().all(|&n| n == 1), "some request answered twice");
    assert_eq!(stats.answered as usize, expected.len());
}

/// An unreachable store still answers every coordinate request.
#[tokio::test]
async fn test_bridge_answers_when_store_is_down() {
    let addr = dead_addr().await.unwrap();
    let layout = StoreLayout::new(&format!("http://{addr}/"), "map", None).unwrap();
    let client = ChunkStoreClient::new(layout, None).unwrap();

    let (events, stats) = run_requests(
        client,
        Addressing::Axial,
        vec![RequestChunk::axial(0, 0), RequestChunk::axial(-1, 1)],
    )
    .await;

    let mut chunks = axial_chunks(events);
    chunks.sort_by_key(|c| (c.q, c.r));
    assert_eq!(
        chunks,
        vec![
            AxialChunk { q: -1, r: 1, tiles: Value::Null },
            AxialChunk { q: 0, r: 0, tiles: Value::Null },
        ]
    );
    assert_eq!(stats.answered, 2);
}

/// Legacy index contract: raw payload on hit, silence on miss.
#[tokio::test]
async fn test_bridge_index_contract() {
    let store = TestStore::start().await.unwrap();
    store.put_json("map/0.json", &json!([[1, 1], [1, 0]])).unwrap();

    let (events, stats) = run_requests(
        store.client(),
        Addressing::Index,
        vec![
            RequestChunk::new(json!(0)),
            RequestChunk::new(json!(1)),
            RequestChunk::new(json!([0, 0])),
        ],
    )
    .await;

    assert_eq!(events, vec![ChunkReceived::Raw(json!([[1, 1], [1, 0]]))]);
    assert_eq!(
        stats,
        BridgeStats {
            dispatched: 2,
            answered: 1,
            dropped: 1,
            rejected: 1,
        }
    );
}
