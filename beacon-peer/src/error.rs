use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Failures surfaced by [`crate::Peer::initialize`] and [`crate::Peer::send`].
#[derive(Debug, Error)]
pub enum PeerError {
    /// The transport reported an error before an identity arrived.
    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// The connection closed before an identity arrived.
    #[error("connection closed before an identity was received")]
    ClosedBeforeIdentity,

    /// An outbound message could not be encoded.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The transport has not been opened yet.
    #[error("peer is not connected")]
    NotConnected,
}
