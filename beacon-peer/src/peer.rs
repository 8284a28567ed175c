use crate::bootstrap::{FsBootstrap, PeerBootstrap};
use crate::error::PeerError;
use beacon_core::{PeerId, SignalMessage};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Client-side handshake lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Disconnected,
    Connecting,
    Connected,
    Handshaking,
    Identified,
}

/// A peer process's view of one signaling connection.
pub struct Peer {
    server_url: String,
    state: PeerState,
    peer_id: Option<PeerId>,
    /// Known peers; reserved for discovery, never populated yet.
    peer_list: Vec<PeerId>,
    bootstrap: Arc<dyn PeerBootstrap>,
    sink: Option<WsSink>,
    stream: Option<WsStream>,
}

impl Peer {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_bootstrap(server_url, Arc::new(FsBootstrap::default()))
    }

    pub fn with_bootstrap(
        server_url: impl Into<String>,
        bootstrap: Arc<dyn PeerBootstrap>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            state: PeerState::Disconnected,
            peer_id: None,
            peer_list: Vec::new(),
            bootstrap,
            sink: None,
            stream: None,
        }
    }

    /// Connect and drive the handshake until an identity is stored.
    ///
    /// Resolves only after `peer-id-init` has been received and the
    /// bootstrap collaborator has run. A transport error or a close before
    /// that point is the single failure outcome; the two are distinct
    /// [`PeerError`] variants.
    pub async fn initialize(&mut self) -> Result<(), PeerError> {
        match self.drive_handshake().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state = PeerState::Disconnected;
                self.sink = None;
                self.stream = None;
                Err(e)
            }
        }
    }

    async fn drive_handshake(&mut self) -> Result<(), PeerError> {
        info!("Attempting to connect to {}", self.server_url);
        self.state = PeerState::Connecting;

        let (socket, _response) = connect_async(&self.server_url).await?;
        info!("WebSocket connection opened");
        self.state = PeerState::Connected;

        let (sink, stream) = socket.split();
        self.sink = Some(sink);
        self.stream = Some(stream);

        // Announce readiness first; the identity may already be in flight.
        self.send(&SignalMessage::PeerEstablishHandshake {}).await?;
        self.state = PeerState::Handshaking;

        let peer_id = self.await_identity().await?;
        info!("Peer ID initialized: {}", peer_id);
        self.peer_id = Some(peer_id.clone());
        self.state = PeerState::Identified;

        // The identity is already resolved; a bootstrap failure is contained.
        if let Err(e) = self.bootstrap.provision(&peer_id).await {
            error!("Error setting up folder structure for peer {}: {}", peer_id, e);
        }

        Ok(())
    }

    async fn await_identity(&mut self) -> Result<PeerId, PeerError> {
        let stream = self.stream.as_mut().ok_or(PeerError::NotConnected)?;

        while let Some(frame) = stream.next().await {
            match frame? {
                Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                    Ok(SignalMessage::PeerIdInit { peer_id }) => return Ok(peer_id),
                    Ok(other) => debug!("Ignoring {:?} before identification", other),
                    Err(e) => warn!("Dropping malformed message: {}", e),
                },
                Message::Close(frame) => {
                    warn!("WebSocket closed before initialization: {:?}", frame);
                    return Err(PeerError::ClosedBeforeIdentity);
                }
                _ => {}
            }
        }

        warn!("WebSocket stream ended before initialization");
        Err(PeerError::ClosedBeforeIdentity)
    }

    /// Serialize `message` and transmit it as one text frame.
    ///
    /// No buffering is added: before the transport is open this fails with
    /// [`PeerError::NotConnected`], afterwards the transport's own error
    /// governs.
    pub async fn send(&mut self, message: &SignalMessage) -> Result<(), PeerError> {
        let sink = self.sink.as_mut().ok_or(PeerError::NotConnected)?;
        let json = serde_json::to_string(message)?;
        sink.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// The identity assigned by the server, if the handshake has completed.
    pub fn peer_id(&self) -> Option<&PeerId> {
        self.peer_id.as_ref()
    }

    pub fn state(&self) -> PeerState {
        self.state
    }

    pub fn peer_list(&self) -> &[PeerId] {
        &self.peer_list
    }
}
