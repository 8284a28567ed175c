use async_trait::async_trait;
use beacon_core::PeerId;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

pub const STATE_DIR_NAME: &str = "state";
pub const STATE_FILE_NAME: &str = "state.json";

/// Seed content for a freshly provisioned `state.json`.
#[derive(Debug, Default, Serialize)]
struct StateSeed {
    current_hash: String,
    target_hash: String,
}

/// Collaborator invoked once an identity is established.
///
/// Kept behind a trait so tests can observe or fail the call without
/// touching the filesystem.
#[async_trait]
pub trait PeerBootstrap: Send + Sync {
    /// Materialize local per-peer state for `peer_id`.
    ///
    /// Must be idempotent: existing directories and state files are left
    /// untouched.
    async fn provision(&self, peer_id: &PeerId) -> io::Result<PathBuf>;
}

/// Filesystem bootstrap: `<root>/<peerId>/state/state.json`.
pub struct FsBootstrap {
    root: PathBuf,
}

impl FsBootstrap {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FsBootstrap {
    fn default() -> Self {
        Self::new("store")
    }
}

#[async_trait]
impl PeerBootstrap for FsBootstrap {
    async fn provision(&self, peer_id: &PeerId) -> io::Result<PathBuf> {
        let peer_dir = self.root.join(peer_id.as_str());
        let state_dir = peer_dir.join(STATE_DIR_NAME);
        tokio::fs::create_dir_all(&state_dir).await?;

        let state_file = state_dir.join(STATE_FILE_NAME);
        if tokio::fs::try_exists(&state_file).await? {
            debug!("State file already exists: {}", state_file.display());
        } else {
            let seed =
                serde_json::to_string_pretty(&StateSeed::default()).map_err(io::Error::other)?;
            tokio::fs::write(&state_file, seed).await?;
            info!("Seeded state file: {}", state_file.display());
        }

        Ok(peer_dir)
    }
}
