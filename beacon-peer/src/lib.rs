mod bootstrap;
mod error;
mod peer;

pub use bootstrap::{FsBootstrap, PeerBootstrap, STATE_DIR_NAME, STATE_FILE_NAME};
pub use error::PeerError;
pub use peer::{Peer, PeerState};
