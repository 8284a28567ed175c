use anyhow::Result;
use beacon_core::SignalMessage;
use beacon_peer::{FsBootstrap, Peer};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beacon-peer", about = "Peer client for the signaling bootstrap")]
struct Args {
    /// Signaling server to connect to.
    #[arg(default_value = "ws://localhost:3000")]
    server_url: String,

    /// Root directory for per-peer state.
    #[arg(long, default_value = "store")]
    store_root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut peer = Peer::with_bootstrap(
        &args.server_url,
        Arc::new(FsBootstrap::new(args.store_root)),
    );
    peer.initialize().await?;

    let peer_id = peer.peer_id().cloned();
    info!("Identified as {:?}", peer_id);

    peer.send(&SignalMessage::PeerIdAcknowledge { peer_id }).await?;

    Ok(())
}
