mod peer;
mod signaling;

pub use peer::{PEER_ID_RAW_LEN, PeerId};
pub use signaling::SignalMessage;
