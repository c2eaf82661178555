//! Axum Handlers for the HTTP surface
//!
//! The relay itself lives in `ws`; the only plain-HTTP route is a root
//! status endpoint that tells callers where the WebSocket lives.

use axum::response::Json;
use serde::Serialize;

/// Static informational payload returned by the root endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

/// Report that the service is up and point callers at the relay endpoint.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "VNC relay is running. Connect via WebSocket at /ws/vnc.",
    })
}
