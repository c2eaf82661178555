//! VNC Bridge Library Crate
//!
//! This library contains all the core logic for the WebSocket-to-VNC
//! relay service: configuration, application state, HTTP routing, and
//! the per-session relay itself. The `bridge` binary is a thin wrapper
//! around this library.

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod ws;
