use crate::SignalingService;
use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beacon_core::{PeerId, SignalMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Upgrade handler for the single signaling endpoint.
///
/// Requests that are not WebSocket upgrades get a plain 400 with a fixed
/// body instead of the extractor's default rejection.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(service): State<SignalingService>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_upgrade(move |socket| handle_socket(socket, service))
            .into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "Not a WebSocket request").into_response(),
    }
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let peer_id = PeerId::generate();
    info!("New WebSocket connection, issuing identity {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(peer_id.clone(), tx);
    info!("Active peers: {}", service.peer_count());

    // The identity is the first frame on every accepted connection.
    service.send_signal(
        &peer_id,
        SignalMessage::PeerIdInit {
            peer_id: peer_id.clone(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let peer_id = peer_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(SignalMessage::PeerEstablishHandshake {}) => {
                            info!("Handshake established by {}", peer_id);
                        }
                        Ok(SignalMessage::PeerIdAcknowledge { peer_id: acked }) => {
                            info!("Peer {} acknowledged identity {:?}", peer_id, acked);
                        }
                        Ok(SignalMessage::Unknown) => {
                            debug!("Ignoring unknown message type from {}", peer_id);
                        }
                        Ok(other) => {
                            debug!("Received {:?} from {}", other, peer_id);
                        }
                        Err(e) => warn!("Invalid SignalMessage from {}: {:?}", peer_id, e),
                    },
                    Message::Close(frame) => {
                        info!("Peer {} closed the connection: {:?}", peer_id, frame);
                        break;
                    }
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&peer_id);
    info!(
        "WebSocket disconnected: {} ({} active)",
        peer_id,
        service.peer_count()
    );
}
