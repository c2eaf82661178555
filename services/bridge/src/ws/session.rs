//! Supervises one client connection from WebSocket accept to teardown.

use super::relay::{self, RelayEnd};
use crate::state::AppState;
use axum::{
    extract::{
        ConnectInfo, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpStream, sync::Mutex};
use tracing::{Instrument, error, info, instrument};

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Runs one relay session to completion.
///
/// Dials the configured VNC server, starts one forwarding task per
/// direction, and tears both endpoints down as soon as either direction
/// stops. Every failure is contained here; nothing escapes the session.
#[instrument(name = "vnc_session", skip_all, fields(session_id, peer = %peer))]
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, peer: SocketAddr) {
    let session_id: u32 = rand::random();
    tracing::Span::current().record("session_id", session_id);
    info!("Accepted client WebSocket connection.");

    let upstream_addr = state.config.upstream_addr();
    let upstream = match TcpStream::connect(&upstream_addr).await {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, addr = %upstream_addr, "Failed to reach the VNC server.");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "upstream unreachable".into(),
                })))
                .await;
            return;
        }
    };
    info!(addr = %upstream_addr, "Connected to the VNC server.");

    // The outbound relay is the only writer on the sink while data flows;
    // the supervisor reclaims it afterwards to send the close frame.
    let (ws_tx, ws_rx) = socket.split();
    let ws_tx = Arc::new(Mutex::new(ws_tx));
    let (tcp_rx, tcp_tx) = upstream.into_split();

    let mut inbound = tokio::spawn(relay::client_to_upstream(ws_rx, tcp_tx).in_current_span());
    let mut outbound =
        tokio::spawn(relay::upstream_to_client(tcp_rx, ws_tx.clone()).in_current_span());

    // First direction to stop wins. The survivor is cancelled rather than
    // waited on, so an idle-but-open peer cannot stall teardown. The join
    // after the abort only collects the cancellation, ensuring both TCP
    // halves are dropped before the close frame goes out.
    let end = tokio::select! {
        res = &mut inbound => {
            outbound.abort();
            let _ = (&mut outbound).await;
            res.unwrap_or(RelayEnd::Failed)
        }
        res = &mut outbound => {
            inbound.abort();
            let _ = (&mut inbound).await;
            res.unwrap_or(RelayEnd::Failed)
        }
    };

    let code = if end.is_clean() {
        close_code::NORMAL
    } else {
        close_code::ERROR
    };
    let mut sink = ws_tx.lock().await;
    let _ = sink
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: "session ended".into(),
        })))
        .await;
    info!(?end, "Relay session closed.");
}
