//! tilebridge-ctl: inspect the chunk store the bridge reads from.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tilebridge_core::config::{StoreConfig, TileBridgeConfig};

mod cmd;

use cmd::chunks::{cmd_get, cmd_path, parse_id};

#[derive(Parser)]
#[command(name = "tilebridge-ctl")]
#[command(version, about = "Inspect chunk paths and contents in a tilebridge store")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Args)]
struct StoreArgs {
    /// Base URL of the chunk store
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Map sub-directory
    #[arg(long, global = true)]
    map: Option<String>,

    /// Chunk directory relative to the base URL
    #[arg(long, global = true)]
    chunk_dir: Option<String>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the resource path and URL of a chunk
    Path {
        /// <token> or <q> <r>
        #[arg(num_args = 1..=2, allow_negative_numbers = true, required = true)]
        id: Vec<String>,
    },

    /// Fetch a chunk and print the bridge's response for it
    Get {
        /// <token> or <q> <r>
        #[arg(num_args = 1..=2, allow_negative_numbers = true, required = true)]
        id: Vec<String>,
    },
}

impl StoreArgs {
    fn apply(self, store: &mut StoreConfig) {
        if let Some(base_url) = self.base_url {
            store.base_url = base_url;
        }
        if let Some(map) = self.map {
            store.map = map;
        }
        if let Some(chunk_dir) = self.chunk_dir {
            store.chunk_dir = chunk_dir;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TileBridgeConfig::load().unwrap_or_else(|e| {
        eprintln!("warning: {e}; using default config");
        TileBridgeConfig::default()
    });
    cli.store.apply(&mut config.store);
    let layout = config.store.layout().context("invalid chunk store location")?;

    match cli.command {
        Cmd::Path { id } => cmd_path(&layout, &parse_id(&id)?),
        Cmd::Get { id } => {
            let found = cmd_get(layout, config.store.timeout(), parse_id(&id)?).await?;
            if !found {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
