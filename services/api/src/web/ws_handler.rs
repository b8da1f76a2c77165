//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns exactly one session: its controller, its view-local state
//! and the timers of its video call.

use crate::{
    error::ApiError,
    web::{
        call_task::{call_process, upload_ack_process},
        dispatch::{handle_client_message, Effect},
        protocol::{ClientMessage, ServerMessage, SessionSnapshot},
        state::{AppState, Outbox, SessionState},
    },
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "New WebSocket connection established.");

    let (sender, mut receiver) = socket.split();
    let (outbox, outbound) = mpsc::unbounded_channel::<ServerMessage>();
    let writer = tokio::spawn(write_outbound(sender, outbound));

    // --- 1. Initialization Phase ---
    let session_state_lock = {
        let session = SessionState::new(&app_state, connection_id);
        let snapshot = SessionSnapshot::capture(&session);
        if outbox.send(ServerMessage::Snapshot(snapshot)).is_err() {
            error!(%connection_id, "Failed to queue the initial snapshot.");
            return;
        }
        Arc::new(Mutex::new(session))
    };

    // --- 2. Main Message Loop ---
    while let Some(received) = receiver.next().await {
        match received {
            Ok(Message::Text(text)) => {
                handle_text_message(text.as_str(), &app_state, &session_state_lock, &outbox).await;
            }
            Ok(Message::Binary(_)) => {
                let _ = outbox.send(ServerMessage::error("Binary frames are not supported"));
            }
            Ok(Message::Close(_)) => {
                info!(%connection_id, "Client sent close message.");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%connection_id, "WebSocket receive failed: {}", ApiError::from(e));
                break;
            }
        }
    }

    // --- 3. Cleanup ---
    session_state_lock.lock().await.call_token.cancel();
    drop(outbox);
    if let Err(e) = writer.await {
        error!(%connection_id, "Writer task failed: {:?}", e);
    }
    info!(%connection_id, "WebSocket connection closed.");
}

/// Drains the outbox into the socket until every sender is gone or the socket fails.
async fn write_outbound(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(msg) = outbound.recv().await {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                error!("{}", ApiError::from(e));
                continue;
            }
        };
        if let Err(e) = sender.send(Message::Text(json.into())).await {
            warn!("Failed to send to client: {}", ApiError::from(e));
            break;
        }
    }
    let _ = sender.close().await;
}

/// Parses one text frame, applies it, and runs whatever timers it asks for.
async fn handle_text_message(
    text: &str,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    outbox: &Outbox,
) {
    let client_msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            let _ = outbox.send(ServerMessage::error(format!("Malformed message: {}", e)));
            return;
        }
    };

    // The lock is held until effects run, so a cancelled timer can never slip a
    // message in after the snapshot that closed its view.
    let mut session = session_state_lock.lock().await;
    let dispatched = handle_client_message(app_state, &mut session, client_msg).await;

    for effect in dispatched.effects {
        match effect {
            Effect::StartCall => {
                session.call_token = CancellationToken::new();
                tokio::spawn(call_process(
                    app_state.config.clone(),
                    session_state_lock.clone(),
                    outbox.clone(),
                    session.call_token.clone(),
                ));
            }
            Effect::StopCall => {
                session.call_token.cancel();
            }
            Effect::ScheduleUploadAckClear => {
                tokio::spawn(upload_ack_process(
                    app_state.config.clone(),
                    session_state_lock.clone(),
                    outbox.clone(),
                    session.call_token.child_token(),
                ));
            }
        }
    }

    for reply in dispatched.replies {
        if outbox.send(reply).is_err() {
            warn!(connection_id = %session.connection_id, "Outbox closed, dropping reply.");
            break;
        }
    }
}
