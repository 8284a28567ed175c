use axum::extract::ws::Message;
use beacon_core::{PeerId, SignalMessage};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
}

/// Live identity-to-connection registry plus the outbound send path.
///
/// Each server instance owns its registry: entries appear when a connection
/// is accepted and vanish when it goes away, so the map never accumulates
/// history and independent instances can coexist in one process.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
        }
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        if self.inner.peers.insert(peer_id.clone(), tx).is_some() {
            // Generation is collision-resistant; a replaced entry means a
            // stale connection was never cleaned up.
            warn!("Identifier {} was already registered", peer_id);
        }
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
    }

    pub fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.inner.peers.contains_key(peer_id)
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send_signal(&self, peer_id: &PeerId, msg: SignalMessage) {
        if let Some(peer) = self.inner.peers.get(peer_id) {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", peer_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize signal message: {}", e),
            }
        } else {
            warn!("Attempted to send signal to disconnected peer {}", peer_id);
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}
