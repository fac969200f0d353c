//! tilebridged: chunk-loading bridge between a UI runtime and a static
//! JSON chunk store.

use anyhow::{Context, Result};
use clap::Parser;

use tilebridge_core::config::TileBridgeConfig;
use tilebridge_services::{runtime_port, Bridge, ChunkStoreClient};

mod cli;
mod stdio;

use cli::{BridgeArgs, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is the event channel in bridge mode; keep logs off it.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    if let Err(e) = TileBridgeConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let mut config = TileBridgeConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        TileBridgeConfig::default()
    });

    match cli.command {
        Some(Command::Bridge(args)) => run_bridge(config, args).await,
        None => run_bridge(config, BridgeArgs::default()).await,
        Some(Command::Serve(args)) => {
            args.apply(&mut config);
            run_serve(config).await
        }
    }
}

async fn run_bridge(mut config: TileBridgeConfig, args: BridgeArgs) -> Result<()> {
    args.apply(&mut config);

    let layout = config.store.layout().context("invalid chunk store location")?;
    let client = ChunkStoreClient::new(layout, config.store.timeout())
        .context("failed to build http client")?;
    tracing::info!(
        base_url = %client.layout().base_url(),
        map = %config.store.map,
        timeout_ms = config.store.timeout_ms,
        "chunk store client ready"
    );

    let (port, handle) = runtime_port(config.bridge.channel_capacity);
    let (requests, responses) = handle.split();

    let bridge_task = tokio::spawn(Bridge::new(client, config.bridge.addressing).run(port));
    let reader_task = tokio::spawn(async move {
        match stdio::read_requests(tokio::io::stdin(), requests).await {
            Ok(forwarded) => tracing::debug!(forwarded, "request reader finished"),
            Err(e) => tracing::error!(error = %e, "request reader failed"),
        }
    });
    let writer_task = tokio::spawn(stdio::write_responses(tokio::io::stdout(), responses));

    // ── Wait for exit ────────────────────────────────────────────────────────

    let stats = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            // A pending stdin read would block runtime shutdown.
            std::process::exit(0);
        }
        r = bridge_task => r.context("bridge task failed")?,
    };

    // The bridge has dropped its response sender, so the writer ends once
    // everything queued is flushed.
    match writer_task.await.context("writer task failed")? {
        Ok(written) => tracing::debug!(written, "response writer finished"),
        Err(e) => tracing::warn!(error = %e, "response writer failed"),
    }
    tracing::info!(
        dispatched = stats.dispatched,
        answered = stats.answered,
        dropped = stats.dropped,
        rejected = stats.rejected,
        "tilebridged exiting"
    );

    // Still blocked on stdin if the bridge stopped because stdout went away.
    if !reader_task.is_finished() {
        std::process::exit(0);
    }
    Ok(())
}

async fn run_serve(config: TileBridgeConfig) -> Result<()> {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
        r = tilebridge_api::serve(&config.serve) => r.context("chunk store server failed"),
    }
}
