//! tilebridge-services: the chunk store client and the request bridge.

pub mod bridge;
pub mod client;
pub mod error;
pub mod port;
pub mod resolver;

pub use bridge::{Bridge, BridgeStats};
pub use client::ChunkStoreClient;
pub use error::{ChunkResult, FetchError};
pub use port::{runtime_port, PortClosed, RuntimeHandle, RuntimePort};
pub use resolver::ChunkResolver;
