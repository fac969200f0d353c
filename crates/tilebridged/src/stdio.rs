//! Stdio adapter: speaks for the UI runtime over JSON lines.
//!
//! stdin carries `request-chunk` events, stdout carries `chunk-received`
//! events, one JSON object per line. Logs go to stderr.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use tilebridge_core::{ChunkReceived, InboundEvent, OutboundEvent, RequestChunk};

/// Forward request lines until EOF or until the bridge stops accepting.
/// Lines that are not a `request-chunk` envelope, including lines that are
/// not UTF-8, are logged and skipped. Returns the number of requests
/// forwarded.
pub async fn read_requests<R>(input: R, requests: mpsc::Sender<RequestChunk>) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut input = BufReader::new(input);
    let mut line = Vec::new();
    let mut forwarded = 0;

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_slice::<InboundEvent>(trimmed) {
            Ok(event) => {
                if requests.send(event.into()).await.is_err() {
                    break;
                }
                forwarded += 1;
            }
            Err(e) => tracing::warn!(error = %e, "skipping malformed event line"),
        }
    }

    Ok(forwarded)
}

/// Write each response as one line, flushing per event. Returns the number
/// of events written once the bridge closes its side.
pub async fn write_responses<W>(
    mut output: W,
    mut responses: mpsc::UnboundedReceiver<ChunkReceived>,
) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while let Some(event) = responses.recv().await {
        let mut line = serde_json::to_vec(&OutboundEvent::from(event)).map_err(io::Error::other)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
        written += 1;
    }

    Ok(written)
}
