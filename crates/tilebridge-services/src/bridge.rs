//! Request bridge: turns `request-chunk` events into store lookups and
//! `chunk-received` events.
//!
//! Every decoded request is resolved on its own spawned task. Tasks report
//! back over an internal channel to the single emission point in `run`, so
//! each request reaches exactly one completion no matter how fetches
//! interleave. There is no ordering, no concurrency cap, and no
//! deduplication: two requests for the same chunk are two fetches and two
//! responses.
//!
//! Response contract per addressing:
//!   Axial: always `{ q, r, tiles }`, `tiles` null when the chunk failed.
//!   Index: the raw payload on success; nothing on failure (legacy).

use std::sync::Arc;

use tokio::sync::mpsc;

use tilebridge_core::{Addressing, AxialChunk, ChunkId, ChunkReceived, RequestChunk};

use crate::error::{ChunkResult, FetchError};
use crate::port::RuntimePort;
use crate::resolver::ChunkResolver;

/// Counters reported when a bridge stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStats {
    /// Requests decoded and handed to a resolver task.
    pub dispatched: u64,
    /// Responses emitted to the runtime.
    pub answered: u64,
    /// Legacy failures that were not answered.
    pub dropped: u64,
    /// Payloads that did not decode under the active addressing.
    pub rejected: u64,
}

struct Completion {
    id: ChunkId,
    result: ChunkResult,
}

/// Reports a resolver task's outcome exactly once. Dropped without a
/// result (the resolver panicked or the task was cancelled), it reports
/// `FetchError::Aborted` for its chunk.
struct CompletionGuard {
    id: Option<ChunkId>,
    done: mpsc::UnboundedSender<Completion>,
}

impl CompletionGuard {
    fn finish(mut self, result: ChunkResult) {
        if let Some(id) = self.id.take() {
            // Receiver gone means the bridge already exited.
            let _ = self.done.send(Completion { id, result });
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::error!(chunk = %id, "resolver task ended without a result");
            let _ = self.done.send(Completion {
                id,
                result: Err(FetchError::Aborted),
            });
        }
    }
}

pub struct Bridge<R> {
    resolver: Arc<R>,
    addressing: Addressing,
}

impl<R: ChunkResolver> Bridge<R> {
    pub fn new(resolver: R, addressing: Addressing) -> Self {
        Self {
            resolver: Arc::new(resolver),
            addressing,
        }
    }

    /// Serve the port until the runtime stops sending requests and every
    /// in-flight request has completed, or until the runtime stops
    /// listening.
    pub async fn run(self, port: RuntimePort) -> BridgeStats {
        let RuntimePort {
            mut requests,
            responses,
        } = port;
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        let mut stats = BridgeStats::default();
        let mut in_flight: usize = 0;
        let mut accepting = true;

        tracing::info!(addressing = %self.addressing, "bridge started");

        loop {
            tokio::select! {
                request = requests.recv(), if accepting => match request {
                    Some(request) => {
                        if self.dispatch(request, &done_tx) {
                            in_flight += 1;
                            stats.dispatched += 1;
                        } else {
                            stats.rejected += 1;
                        }
                    }
                    None => {
                        accepting = false;
                        tracing::debug!(in_flight, "request channel closed, draining");
                    }
                },
                Some(done) = done_rx.recv(), if in_flight > 0 => {
                    in_flight -= 1;
                    match self.complete(done) {
                        Some(event) => {
                            if responses.send(event).is_err() {
                                tracing::warn!(in_flight, "runtime stopped listening, bridge exiting");
                                break;
                            }
                            stats.answered += 1;
                        }
                        None => stats.dropped += 1,
                    }
                },
                else => break,
            }

            if !accepting && in_flight == 0 {
                break;
            }
        }

        tracing::info!(
            dispatched = stats.dispatched,
            answered = stats.answered,
            dropped = stats.dropped,
            rejected = stats.rejected,
            "bridge stopped"
        );
        stats
    }

    /// Decode a request and spawn its resolution. Returns false if the
    /// payload was rejected.
    fn dispatch(&self, request: RequestChunk, done: &mpsc::UnboundedSender<Completion>) -> bool {
        let id = match ChunkId::decode(self.addressing, &request.payload) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "rejected chunk request");
                return false;
            }
        };

        tracing::debug!(chunk = %id, "chunk requested");

        let resolver = self.resolver.clone();
        let guard = CompletionGuard {
            id: Some(id.clone()),
            done: done.clone(),
        };
        tokio::spawn(async move {
            let result = resolver.resolve(&id).await;
            guard.finish(result);
        });
        true
    }

    /// Build the outbound event for a finished request, if the contract
    /// calls for one.
    fn complete(&self, done: Completion) -> Option<ChunkReceived> {
        match (done.id, done.result) {
            (ChunkId::Axial { q, r }, Ok(tiles)) => {
                Some(ChunkReceived::Axial(AxialChunk { q, r, tiles }))
            }
            (ChunkId::Axial { q, r }, Err(_)) => Some(ChunkReceived::missing(q, r)),
            (ChunkId::Token(_), Ok(payload)) => Some(ChunkReceived::Raw(payload)),
            (ChunkId::Token(token), Err(e)) => {
                tracing::info!(chunk = %token, error = %e, "chunk not found");
                None
            }
        }
    }
}
