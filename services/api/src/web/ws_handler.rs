//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a chat WebSocket
//! connection. One connection owns one transcript; turns run sequentially.

use crate::web::{
    chat_task::chat_turn,
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, ChatSessionState},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New chat WebSocket connection established.");

    // The sender is wrapped in an Arc<Mutex<>> so the turn task can share it.
    let (sender, mut receiver) = socket.split();
    let ws_sender = Arc::new(Mutex::new(sender));

    // The transcript is lazily created per connection and opens with the
    // assistant's greeting.
    let mut session = ChatSessionState::new();
    let welcome = session.transcript.messages()[0].clone();
    let welcome_msg = ServerMessage::Welcome {
        message_id: welcome.id,
        text: welcome.text,
    };
    let welcome_json = serde_json::to_string(&welcome_msg).unwrap();
    if ws_sender
        .lock()
        .await
        .send(Message::Text(welcome_json.into()))
        .await
        .is_err()
    {
        error!("Failed to send welcome message.");
        return;
    }

    // Main message loop. Turns are strictly sequential: the next client
    // message is not read until the current reply stream is drained.
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Send { text }) => {
                        if let Err(e) =
                            chat_turn(app_state.clone(), &mut session, ws_sender.clone(), text)
                                .await
                        {
                            error!("Chat turn failed: {:?}", e);
                            let err_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let err_json = serde_json::to_string(&err_msg).unwrap();
                            let _ = ws_sender
                                .lock()
                                .await
                                .send(Message::Text(err_json.into()))
                                .await;
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to deserialize client message: {}", e);
                        let err_msg = ServerMessage::Error {
                            message: "Malformed message.".to_string(),
                        };
                        let err_json = serde_json::to_string(&err_msg).unwrap();
                        if ws_sender
                            .lock()
                            .await
                            .send(Message::Text(err_json.into()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                },
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    info!("Chat WebSocket connection closed.");
}
