//! tilebridge-core: chunk identifiers, store layout, port events, and config.
//! All other tilebridge crates depend on this one.

pub mod chunk_id;
pub mod config;
pub mod events;
pub mod layout;

pub use chunk_id::{Addressing, ChunkId, IdError};
pub use events::{AxialChunk, ChunkReceived, InboundEvent, OutboundEvent, RequestChunk};
pub use layout::{map_from_query, LayoutError, StoreLayout};
