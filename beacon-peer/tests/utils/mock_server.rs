use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use beacon_core::{PeerId, SignalMessage};

type MockSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type MockStream = SplitStream<WebSocketStream<TcpStream>>;

/// How a scripted signaling server treats its one accepted connection.
pub enum ServerScript {
    /// Push `peer-id-init` immediately on accept.
    IssueImmediately(PeerId),
    /// Wait for the handshake announcement, then issue.
    IssueAfterHandshake(PeerId),
    /// Send the given raw text frames first, then issue.
    SendRawThenIssue(Vec<String>, PeerId),
    /// Issue the identity and close right behind it.
    IssueThenClose(PeerId),
    /// Close without issuing anything.
    CloseImmediately,
}

/// Bind an ephemeral port and serve exactly one scripted connection.
///
/// Returns the bound address plus a channel carrying every envelope the
/// peer sends to the server.
pub async fn spawn_mock_server(
    script: ServerScript,
) -> (SocketAddr, mpsc::UnboundedReceiver<SignalMessage>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Listener has no local addr");
    let (capture_tx, capture_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("Accept failed");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("WebSocket handshake failed");
        run_script(ws, script, capture_tx).await;
    });

    (addr, capture_rx)
}

async fn run_script(
    ws: WebSocketStream<TcpStream>,
    script: ServerScript,
    capture_tx: mpsc::UnboundedSender<SignalMessage>,
) {
    let (mut sink, mut stream) = ws.split();

    match script {
        ServerScript::IssueImmediately(peer_id) => {
            issue(&mut sink, peer_id).await;
            observe(&mut stream, &capture_tx).await;
        }
        ServerScript::IssueAfterHandshake(peer_id) => {
            loop {
                let Some(Ok(frame)) = stream.next().await else {
                    return;
                };
                if let Message::Text(text) = frame {
                    if let Ok(msg) = serde_json::from_str::<SignalMessage>(&text) {
                        let is_handshake = msg == SignalMessage::PeerEstablishHandshake {};
                        let _ = capture_tx.send(msg);
                        if is_handshake {
                            break;
                        }
                    }
                }
            }
            issue(&mut sink, peer_id).await;
            observe(&mut stream, &capture_tx).await;
        }
        ServerScript::SendRawThenIssue(frames, peer_id) => {
            for frame in frames {
                let _ = sink.send(Message::Text(frame.into())).await;
            }
            issue(&mut sink, peer_id).await;
            observe(&mut stream, &capture_tx).await;
        }
        ServerScript::IssueThenClose(peer_id) => {
            issue(&mut sink, peer_id).await;
            let _ = sink.send(Message::Close(None)).await;
            observe(&mut stream, &capture_tx).await;
        }
        ServerScript::CloseImmediately => {
            let _ = sink.send(Message::Close(None)).await;
            // Drain until the close handshake completes.
            while let Some(Ok(_)) = stream.next().await {}
        }
    }
}

async fn issue(sink: &mut MockSink, peer_id: PeerId) {
    let msg = SignalMessage::PeerIdInit { peer_id };
    let json = serde_json::to_string(&msg).expect("Envelope serializes");
    let _ = sink.send(Message::Text(json.into())).await;
}

async fn observe(stream: &mut MockStream, capture_tx: &mpsc::UnboundedSender<SignalMessage>) {
    while let Some(Ok(frame)) = stream.next().await {
        if let Message::Text(text) = frame {
            if let Ok(msg) = serde_json::from_str::<SignalMessage>(&text) {
                let _ = capture_tx.send(msg);
            }
        }
    }
}
