//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns one wizard session; every client message becomes a
//! dispatched action, and the resulting state is pushed straight back.

use crate::web::{
    protocol::{ClientMessage, ServerMessage, SessionSnapshot},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use scholarmind_core::session::{DispatchReply, SessionAction, SessionState};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>, // from auth middleware
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, user_id))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, user_id: Uuid) {
    info!("Research session opened for user: {}", user_id);

    let (mut sender, mut receiver) = socket.split();

    // Each connection gets a fresh wizard. All generation outcomes are
    // archived under the authenticated user.
    let mut session = SessionState::new();

    // --- 1. Bootstrap Phase ---
    // Fetch the trending list before the first paint. This cannot fail; at
    // worst the list is the static fallback.
    session
        .dispatch(
            SessionAction::RefreshTopics,
            &app_state.generator,
            Some(user_id),
        )
        .await;
    if send_message(
        &mut sender,
        &ServerMessage::SessionUpdate {
            session: SessionSnapshot::of(&session),
        },
    )
    .await
    .is_err()
    {
        error!("Failed to send initial session snapshot.");
        return;
    }

    // --- 2. Main Message Loop ---
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => client_msg,
                    Err(e) => {
                        warn!("Failed to deserialize client message: {}", e);
                        let err_msg = ServerMessage::Error {
                            message: "Unrecognized message.".to_string(),
                        };
                        if send_message(&mut sender, &err_msg).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                let reply = session
                    .dispatch(client_msg.into_action(), &app_state.generator, Some(user_id))
                    .await;

                let followup = match reply {
                    DispatchReply::Updated => None,
                    DispatchReply::Rejected(notice) => Some(ServerMessage::Notice {
                        message: notice.message().to_string(),
                    }),
                    DispatchReply::Content {
                        content_type,
                        outcome,
                    } => Some(ServerMessage::Content {
                        content_type,
                        fallback: !outcome.succeeded,
                        text: outcome.text,
                    }),
                };

                // Snapshot first so the client renders the new state, then
                // any notice or content produced by the action.
                let snapshot = ServerMessage::SessionUpdate {
                    session: SessionSnapshot::of(&session),
                };
                if send_message(&mut sender, &snapshot).await.is_err() {
                    break;
                }
                if let Some(followup) = followup {
                    if send_message(&mut sender, &followup).await.is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => {
                info!("Client sent close message.");
                break;
            }
            _ => {}
        }
    }

    // --- 3. Cleanup ---
    info!("Research session closed for user: {}", user_id);
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).unwrap();
    sender.send(Message::Text(json.into())).await
}
