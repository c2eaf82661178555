//! The two byte-forwarding loops that make up a relay session.
//!
//! Each direction owns exactly one reader and one writer: the inbound
//! loop reads the client WebSocket and writes the upstream TCP half,
//! the outbound loop reads upstream TCP and writes the client sink.
//! Neither loop interprets the bytes it moves; RFB framing is entirely
//! the business of the two endpoints.

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
    sync::Mutex,
};
use tracing::{error, info, warn};

/// Largest chunk read from the upstream TCP socket in one pass. A TCP
/// read boundary does not need to align with any RFB message boundary.
const UPSTREAM_READ_BUF_SIZE: usize = 65536;

/// How a relay direction stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RelayEnd {
    /// The client closed its WebSocket. A normal end of session.
    ClientClosed,
    /// The upstream server closed the TCP stream. A normal end of session.
    UpstreamClosed,
    /// A transport read or write failed. Already logged at the source.
    Failed,
}

impl RelayEnd {
    /// Whether this direction stopped because a peer went away cleanly.
    pub(crate) fn is_clean(self) -> bool {
        matches!(self, RelayEnd::ClientClosed | RelayEnd::UpstreamClosed)
    }
}

/// Forwards binary WebSocket messages from the client to the VNC server.
pub(crate) async fn client_to_upstream(
    mut ws_rx: SplitStream<WebSocket>,
    mut tcp_tx: OwnedWriteHalf,
) -> RelayEnd {
    let end = loop {
        match ws_rx.next().await {
            Some(Ok(Message::Binary(data))) => {
                // Finish this write before taking the next message so a
                // stalled upstream back-pressures the client instead of
                // buffering without bound.
                if let Err(e) = tcp_tx.write_all(&data).await {
                    error!(error = %e, "Failed to write client data to the VNC server.");
                    break RelayEnd::Failed;
                }
                if let Err(e) = tcp_tx.flush().await {
                    error!(error = %e, "Failed to flush client data to the VNC server.");
                    break RelayEnd::Failed;
                }
            }
            Some(Ok(Message::Text(_))) => {
                warn!("Ignoring text frame; the tunnel only carries binary messages.");
            }
            // Ping/pong replies are produced by the WebSocket layer itself.
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            Some(Ok(Message::Close(_))) | None => {
                info!("Client disconnected.");
                break RelayEnd::ClientClosed;
            }
            Some(Err(e)) => {
                error!(error = %e, "Error receiving from client WebSocket.");
                break RelayEnd::Failed;
            }
        }
    };

    // Half-close towards the server so it observes EOF even while the
    // outbound direction is still draining.
    let _ = tcp_tx.shutdown().await;
    end
}

/// Forwards chunks read from the VNC server to the client, one binary
/// WebSocket message per read.
pub(crate) async fn upstream_to_client(
    mut tcp_rx: OwnedReadHalf,
    ws_tx: Arc<Mutex<SplitSink<WebSocket, Message>>>,
) -> RelayEnd {
    let mut buf = vec![0u8; UPSTREAM_READ_BUF_SIZE];
    loop {
        match tcp_rx.read(&mut buf).await {
            Ok(0) => {
                info!("VNC server closed the stream.");
                return RelayEnd::UpstreamClosed;
            }
            Ok(n) => {
                let chunk = Bytes::copy_from_slice(&buf[..n]);
                let mut sink = ws_tx.lock().await;
                if let Err(e) = sink.send(Message::Binary(chunk)).await {
                    error!(error = %e, "Failed to forward VNC data to the client.");
                    return RelayEnd::Failed;
                }
            }
            Err(e) => {
                error!(error = %e, "Error reading from the VNC server.");
                return RelayEnd::Failed;
            }
        }
    }
}
