//! Reload endpoint: the client script and the WebSocket clients connect to.

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use super::broadcast::{ReloadBroadcaster, ReloadEvent};
use super::protocol::{ClientMessage, ServerMessage};
use crate::assets;

/// Asset name of the reload client script.
pub const LIVERELOAD_SCRIPT: &str = "livereload.js";

/// Routes for the reload listener.
pub fn reload_router(broadcaster: ReloadBroadcaster) -> Router {
    Router::new()
        .route("/livereload.js", get(client_script))
        .route("/livereload", get(upgrade))
        .with_state(broadcaster)
}

async fn client_script() -> Response {
    assets::asset_response(LIVERELOAD_SCRIPT)
}

async fn upgrade(ws: WebSocketUpgrade, State(broadcaster): State<ReloadBroadcaster>) -> Response {
    let events = broadcaster.subscribe();
    ws.on_upgrade(move |socket| client_session(socket, events))
}

async fn client_session(socket: WebSocket, mut events: broadcast::Receiver<ReloadEvent>) {
    crate::debug_event!("reload", "client connected");
    let (mut sink, mut incoming) = socket.split();

    loop {
        tokio::select! {
            message = incoming.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(ClientMessage::Hello { .. }) => {
                            if send(&mut sink, &ServerMessage::hello()).await.is_err() {
                                break;
                            }
                        }
                        Ok(ClientMessage::Info { url }) => {
                            crate::debug_event!("reload", "client page", "{}", url.unwrap_or_default());
                        }
                        Ok(ClientMessage::Other) => {}
                        Err(e) => crate::debug_event!("reload", "bad message", "{e}"),
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },

            event = events.recv() => match event {
                Ok(event) => {
                    let message = ServerMessage::Reload {
                        path: event.path,
                        live_css: event.live_css,
                    };
                    if send(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("[reload] client lagged by {n} events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    crate::debug_event!("reload", "client disconnected");
}

async fn send(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).map_err(axum::Error::new)?;
    sink.send(Message::Text(json.into())).await
}
