#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use relay_api::config::Config;
use relay_api::AppState;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a frame (or a state change) before failing.
pub const WAIT: Duration = Duration::from_secs(5);

/// Build a fresh AppState with default configuration.
pub fn test_state() -> AppState {
    AppState::new(Config::default())
}

/// Build the full application router wired to a fresh state.
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = relay_api::routes::router().with_state(state.clone());
    (app, state)
}

/// Start an actual TCP server for WebSocket testing. The server runs in the
/// background for the rest of the test.
pub async fn start_ws_server(config: Config) -> (SocketAddr, AppState) {
    let state = AppState::new(config);
    let app = relay_api::routes::router().with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

/// Connect as `username` and wait until the relay has registered the
/// connection, so it is guaranteed to see every later broadcast.
pub async fn connect(addr: SocketAddr, state: &AppState, username: &str) -> WsClient {
    let expected = state.registry.len() + 1;
    let url = format!("ws://{addr}/ws/{username}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("ws connect");
    wait_for_connections(state, expected).await;
    ws
}

/// Wait until exactly `n` connections are registered.
pub async fn wait_for_connections(state: &AppState, n: usize) {
    time::timeout(WAIT, async {
        while state.registry.len() != n {
            time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "expected {n} connections, registry has {}",
            state.registry.len()
        )
    });
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.into())).await.expect("ws send");
}

/// Read the next text frame, skipping control frames.
pub async fn next_text(ws: &mut WsClient) -> String {
    loop {
        let msg = time::timeout(WAIT, ws.next())
            .await
            .expect("timeout waiting for frame")
            .expect("stream ended")
            .expect("ws read error");

        match msg {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Assert that no text frame arrives within `window`.
pub async fn assert_silent(ws: &mut WsClient, window: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = time::timeout(window, ws.next()).await {
        panic!("expected no frame, got {text:?}");
    }
}
