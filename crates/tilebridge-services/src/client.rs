//! Chunk store client: GETs chunk files from the static store.
//!
//! Success is a 2xx status AND a JSON body. Everything else (bad status,
//! network failure, unparseable body) comes back as `Err(FetchError)`;
//! nothing is retried and nothing is cached.

use std::time::Duration;

use reqwest::Url;
use tilebridge_core::{ChunkId, StoreLayout};

use crate::error::{ChunkResult, FetchError};
use crate::resolver::ChunkResolver;

#[derive(Debug, Clone)]
pub struct ChunkStoreClient {
    http: reqwest::Client,
    layout: StoreLayout,
}

impl ChunkStoreClient {
    /// Build a client for `layout`. `timeout` of `None` leaves requests
    /// unbounded.
    pub fn new(layout: StoreLayout, timeout: Option<Duration>) -> reqwest::Result<Self> {
        // No idle connections survive a request.
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            layout,
        })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Fetch and classify one chunk.
    pub async fn resolve(&self, id: &ChunkId) -> ChunkResult {
        let url = self.layout.chunk_url(id);
        let result = self.fetch(url).await;

        match &result {
            Ok(_) => tracing::debug!(chunk = %id, "chunk loaded"),
            Err(e) if e.is_not_found() => tracing::debug!(chunk = %id, "chunk not in store"),
            Err(e) => tracing::warn!(
                chunk = %id,
                path = %self.layout.resource_path(id),
                kind = e.kind(),
                error = %e,
                "chunk fetch failed"
            ),
        }

        result
    }

    async fn fetch(&self, url: Url) -> ChunkResult {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        serde_json::from_slice(&body).map_err(FetchError::Malformed)
    }
}

impl ChunkResolver for ChunkStoreClient {
    fn resolve(&self, id: &ChunkId) -> impl std::future::Future<Output = ChunkResult> + Send {
        ChunkStoreClient::resolve(self, id)
    }
}
