use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tilebridge_core::config::TileBridgeConfig;
use tilebridge_core::{map_from_query, Addressing};

#[derive(Parser)]
#[command(name = "tilebridged")]
#[command(version, about = "Bridge UI chunk requests to a static JSON chunk store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Attach a UI runtime over stdin/stdout JSON lines (default)
    Bridge(BridgeArgs),

    /// Serve a directory as the static chunk store
    Serve(ServeArgs),
}

#[derive(Args, Default)]
pub struct BridgeArgs {
    /// Base URL of the chunk store
    #[arg(long)]
    pub base_url: Option<String>,

    /// Map sub-directory to load chunks from
    #[arg(long)]
    pub map: Option<String>,

    /// Page query string to take the map from, e.g. "?map=forest"
    #[arg(long, conflicts_with = "map")]
    pub query: Option<String>,

    /// Identifier scheme: "axial" or "index"
    #[arg(long)]
    pub addressing: Option<Addressing>,
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Directory to serve
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl BridgeArgs {
    /// Flags win over config values.
    pub fn apply(self, config: &mut TileBridgeConfig) {
        if let Some(base_url) = self.base_url {
            config.store.base_url = base_url;
        }
        if let Some(map) = self.map.or_else(|| self.query.as_deref().and_then(map_from_query)) {
            config.store.map = map;
        }
        if let Some(addressing) = self.addressing {
            config.bridge.addressing = addressing;
        }
    }
}

impl ServeArgs {
    pub fn apply(self, config: &mut TileBridgeConfig) {
        if let Some(root) = self.root {
            config.serve.root = root;
        }
        if let Some(port) = self.port {
            config.serve.port = port;
        }
    }
}
