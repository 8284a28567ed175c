pub use beacon_core::model::PeerId;

pub mod model {
    pub use beacon_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use beacon_server::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use beacon_peer::*;
}
