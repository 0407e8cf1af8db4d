//! WebSocket upgrade handler and per-connection event loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};

use crate::error::{ApiError, ApiErrorBody};
use crate::AppState;

use super::connection::{ConnectionHandle, ConnectionId, Outbound};
use super::relay::Relay;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/{username}", get(ws_upgrade))
}

/// Why a connection's event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    ClientClosed,
    ReadError,
    WriteError,
    Dropped,
}

impl CloseReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::ClientClosed => "client closed",
            Self::ReadError => "read error",
            Self::WriteError => "write error",
            Self::Dropped => "dropped by relay",
        }
    }
}

#[utoipa::path(
    get,
    path = "/ws/{username}",
    tag = "Relay",
    params(
        ("username" = String, Path, description = "Display name shown next to every message"),
    ),
    responses(
        (status = 101, description = "Switched to the WebSocket relay protocol"),
        (status = 400, description = "Blank display name", body = ApiErrorBody),
    ),
)]
pub async fn ws_upgrade(
    Path(username): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::bad_request("Display name must not be blank"));
    }

    Ok(ws.on_upgrade(move |socket| handle_connection(socket, state, username)))
}

async fn handle_connection(socket: WebSocket, state: AppState, username: String) {
    let (ws_tx, ws_rx) = socket.split();

    let id = ConnectionId::from(state.snowflake.generate());
    let (handle, outbound) = ConnectionHandle::new(id);

    state.relay.join(handle, &username);

    tracing::info!(
        connection_id = %id,
        username = %username,
        online = state.registry.len(),
        "relay connection opened"
    );

    let reason = run_connection(id, &username, &state.relay, ws_tx, ws_rx, outbound).await;

    let announced = state.relay.depart(id);

    tracing::info!(
        connection_id = %id,
        username = %username,
        reason = reason.as_str(),
        announced,
        connected_for_ms = (chrono::Utc::now() - id.accepted_at()).num_milliseconds(),
        "relay connection closed"
    );
}

/// Main event loop: relay client frames, write queued frames to the socket.
///
/// Each inbound frame is fully broadcast before the next one is read, which
/// keeps one sender's messages in order for every recipient.
async fn run_connection(
    id: ConnectionId,
    username: &str,
    relay: &Relay,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    mut outbound: Outbound,
) -> CloseReason {
    loop {
        tokio::select! {
            // Client sends us a message.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        relay.relay(username, text.as_str());
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        tracing::debug!(connection_id = %id, len = bytes.len(), "ignoring binary frame");
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) | None => return CloseReason::ClientClosed,
                    Some(Err(e)) => {
                        tracing::debug!(?e, connection_id = %id, "ws read error");
                        return CloseReason::ReadError;
                    }
                }
            }

            // Frame queued for this client by a broadcast.
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    return CloseReason::Dropped;
                };
                if let Err(e) = ws_tx.send(Message::Text(frame)).await {
                    tracing::debug!(?e, connection_id = %id, "ws write error");
                    return CloseReason::WriteError;
                }
            }
        }
    }
}
