mod signaling;

pub use signaling::*;

use axum::{Router, routing::get};

/// Default listening port; override with the binary's `--port`.
pub const DEFAULT_PORT: u16 = 3000;

/// Build the signaling router: one upgrade endpoint at `/`.
pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .with_state(service)
}
