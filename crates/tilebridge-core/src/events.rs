//! Port events exchanged with the UI runtime.
//!
//! One inbound kind (`request-chunk`) and one outbound kind
//! (`chunk-received`). When the runtime is attached over a byte stream the
//! events travel as JSON lines:
//!
//!   {"event":"request-chunk","payload":[2,-1]}
//!   {"event":"chunk-received","payload":{"q":2,"r":-1,"tiles":null}}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request for one chunk. The payload is decoded by the bridge according
/// to its addressing, so it stays raw here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestChunk {
    pub payload: Value,
}

impl RequestChunk {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Coordinate request as the runtime sends it: `[q, r]`.
    pub fn axial(q: i32, r: i32) -> Self {
        Self::new(Value::from(vec![q, r]))
    }
}

/// Coordinate-contract response. `tiles` is `Value::Null` when the chunk
/// could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialChunk {
    pub q: i32,
    pub r: i32,
    pub tiles: Value,
}

/// Payload delivered back to the runtime.
///
/// Outbound only: a legacy raw payload may itself look like `{ q, r, tiles }`,
/// so the wire form cannot be read back into a variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChunkReceived {
    Axial(AxialChunk),
    /// Legacy index contract: the chunk payload itself.
    Raw(Value),
}

impl ChunkReceived {
    /// Null sentinel response for a coordinate request.
    pub fn missing(q: i32, r: i32) -> Self {
        ChunkReceived::Axial(AxialChunk { q, r, tiles: Value::Null })
    }
}

// ── Stream envelopes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum InboundEvent {
    RequestChunk(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum OutboundEvent {
    ChunkReceived(ChunkReceived),
}

impl From<InboundEvent> for RequestChunk {
    fn from(event: InboundEvent) -> Self {
        match event {
            InboundEvent::RequestChunk(payload) => RequestChunk::new(payload),
        }
    }
}

impl From<ChunkReceived> for OutboundEvent {
    fn from(received: ChunkReceived) -> Self {
        OutboundEvent::ChunkReceived(received)
    }
}
