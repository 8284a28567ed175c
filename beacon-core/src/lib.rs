pub mod model;

pub use model::{PeerId, SignalMessage};
