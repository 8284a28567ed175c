use std::sync::Arc;

use beacon_core::PeerId;
use beacon_peer::{Peer, PeerState};

use crate::integration::init_tracing;
use crate::utils::{MockBootstrap, ServerScript, spawn_mock_server};

#[tokio::test]
async fn test_close_after_identity_keeps_outcome() {
    init_tracing();

    let (addr, _inbound) =
        spawn_mock_server(ServerScript::IssueThenClose(PeerId::from("abc123"))).await;

    let mut peer = Peer::with_bootstrap(
        format!("ws://{}", addr),
        Arc::new(MockBootstrap::new()),
    );

    // The close lands right behind the identity; the already-delivered
    // outcome must not flip.
    peer.initialize().await.expect("Initialization failed");

    assert_eq!(peer.peer_id(), Some(&PeerId::from("abc123")));
    assert_eq!(peer.state(), PeerState::Identified);
}
