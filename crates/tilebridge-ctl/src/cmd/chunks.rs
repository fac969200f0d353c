//! Chunk inspection commands.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use tilebridge_core::{AxialChunk, ChunkId, StoreLayout};
use tilebridge_services::ChunkStoreClient;

/// `<token>` or `<q> <r>`.
pub fn parse_id(parts: &[String]) -> Result<ChunkId> {
    match parts {
        [token] => Ok(ChunkId::token(token.as_str())?),
        [q, r] => Ok(ChunkId::axial(
            q.parse().context("q must be a 32-bit integer")?,
            r.parse().context("r must be a 32-bit integer")?,
        )),
        _ => bail!("expected <token> or <q> <r>"),
    }
}

pub fn cmd_path(layout: &StoreLayout, id: &ChunkId) -> Result<()> {
    println!("  path : {}", layout.resource_path(id));
    println!("  url  : {}", layout.chunk_url(id));
    Ok(())
}

/// Resolve one chunk the way the bridge would and print the response.
/// Returns false when the chunk could not be loaded.
pub async fn cmd_get(layout: StoreLayout, timeout: Option<Duration>, id: ChunkId) -> Result<bool> {
    let client = ChunkStoreClient::new(layout, timeout).context("failed to build http client")?;
    let result = client.resolve(&id).await;

    let failure = match (id, result) {
        (ChunkId::Axial { q, r }, result) => {
            let (tiles, failure) = match result {
                Ok(tiles) => (tiles, None),
                Err(e) => (Value::Null, Some(e)),
            };
            println!("{}", serde_json::to_string_pretty(&AxialChunk { q, r, tiles })?);
            failure.map(|e| (format!("({q}, {r})"), e))
        }
        (ChunkId::Token(_), Ok(payload)) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            None
        }
        (ChunkId::Token(token), Err(e)) => Some((token, e)),
    };

    match failure {
        Some((chunk, e)) => {
            eprintln!("chunk {chunk} not loaded ({}): {e}", e.kind());
            Ok(false)
        }
        None => Ok(true),
    }
}
