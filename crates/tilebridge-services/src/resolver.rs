//! Resolver trait for chunk sources.
//!
//! The bridge only needs "give me this chunk, eventually". This trait is
//! the contract between the bridge (which owns the event flow) and the
//! source (which knows where chunks live).

use std::future::Future;

use tilebridge_core::ChunkId;

use crate::error::ChunkResult;

/// A source that turns an identifier into a chunk result.
///
/// Failures are `Err(FetchError)`. A resolver that panics is reported to
/// the bridge as `FetchError::Aborted`.
pub trait ChunkResolver: Send + Sync + 'static {
    fn resolve(&self, id: &ChunkId) -> impl Future<Output = ChunkResult> + Send;
}
