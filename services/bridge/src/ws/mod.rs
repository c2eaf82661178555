//! WebSocket Relay Sessions
//!
//! This module contains the core logic for tunneling a browser VNC
//! client to the upstream RFB server. It is structured into submodules:
//!
//! - `session`: supervises one client connection, from WebSocket accept
//!   and upstream dial through ordered teardown of both endpoints.
//! - `relay`: the two forwarding loops that move raw bytes between the
//!   WebSocket and the TCP connection, one per direction.

mod relay;
pub mod session;

pub use session::ws_handler;
