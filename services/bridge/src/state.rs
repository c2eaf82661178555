//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! clonable resources handlers need — for this service, just the
//! configuration describing the upstream VNC server.

use crate::config::Config;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}
