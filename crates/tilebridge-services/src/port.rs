//! Runtime port: the one inbound and one outbound channel joining a bridge
//! to a UI runtime instance.
//!
//! The bridge owns a `RuntimePort`; whoever speaks for the runtime (the
//! stdio adapter, a test) owns the matching `RuntimeHandle`.

use tokio::sync::mpsc;

use tilebridge_core::{ChunkReceived, RequestChunk};

/// Bridge side of the port.
pub struct RuntimePort {
    pub(crate) requests: mpsc::Receiver<RequestChunk>,
    pub(crate) responses: mpsc::UnboundedSender<ChunkReceived>,
}

/// Runtime side of the port.
pub struct RuntimeHandle {
    requests: mpsc::Sender<RequestChunk>,
    responses: mpsc::UnboundedReceiver<ChunkReceived>,
}

/// The runtime has gone away.
#[derive(Debug, thiserror::Error)]
#[error("runtime port closed")]
pub struct PortClosed;

/// Create a connected port pair. `capacity` bounds queued requests.
pub fn runtime_port(capacity: usize) -> (RuntimePort, RuntimeHandle) {
    let (request_tx, request_rx) = mpsc::channel(capacity.max(1));
    let (response_tx, response_rx) = mpsc::unbounded_channel();
    (
        RuntimePort {
            requests: request_rx,
            responses: response_tx,
        },
        RuntimeHandle {
            requests: request_tx,
            responses: response_rx,
        },
    )
}

impl RuntimeHandle {
    /// Emit a `request-chunk` event.
    pub async fn request(&self, request: RequestChunk) -> Result<(), PortClosed> {
        self.requests.send(request).await.map_err(|_| PortClosed)
    }

    /// Next `chunk-received` event. `None` once the bridge is gone.
    pub async fn next_response(&mut self) -> Option<ChunkReceived> {
        self.responses.recv().await
    }

    /// Stop issuing requests. The returned receiver still yields responses
    /// for requests already issued; it ends when the bridge has drained.
    pub fn finish(self) -> mpsc::UnboundedReceiver<ChunkReceived> {
        self.responses
    }

    /// Split into raw channel halves, for adapters that drive the two
    /// directions from separate tasks.
    pub fn split(
        self,
    ) -> (
        mpsc::Sender<RequestChunk>,
        mpsc::UnboundedReceiver<ChunkReceived>,
    ) {
        (self.requests, self.responses)
    }
}
