use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

/// Wire envelope: `{ "type": <tag>, "data": <payload> }`.
///
/// Tags outside the known vocabulary decode as [`SignalMessage::Unknown`]
/// so either side can ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum SignalMessage {
    /// Peer announces readiness immediately after the transport opens.
    PeerEstablishHandshake {},
    /// Server pushes a freshly issued identifier as the first frame.
    PeerIdInit {
        #[serde(rename = "peerId")]
        peer_id: PeerId,
    },
    /// Peer reports the identity it ended up with (application-level).
    PeerIdAcknowledge {
        #[serde(rename = "peerId")]
        peer_id: Option<PeerId>,
    },
    #[serde(other)]
    Unknown,
}
