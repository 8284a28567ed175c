use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw entropy behind a generated identifier; rendered as twice as many hex chars.
pub const PEER_ID_RAW_LEN: usize = 20;

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct PeerId(pub String);

impl PeerId {
    /// Generate a fresh identifier from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut raw = [0u8; PEER_ID_RAW_LEN];
        OsRng.fill_bytes(&mut raw);
        Self(hex::encode(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
