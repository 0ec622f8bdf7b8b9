//! services/api/src/web/chat_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! handling a single chat turn: user message in, streamed reply out.

use crate::web::{
    protocol::ServerMessage,
    state::{AppState, ChatSessionState},
};
use axum::extract::ws::{Message, WebSocket};
use bookstore_core::{
    chat::{with_fallback, FALLBACK_REPLY},
    domain::ChatMessage,
    ports::{PortError, PortResult},
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Runs one chat turn against the assistant adapter.
///
/// The user turn is appended to the transcript, a model turn is opened, and
/// fragments are forwarded to the client strictly in arrival order while the
/// transcript's streaming tail grows in place. A transport failure anywhere
/// in the turn surfaces as the fixed fallback reply, never as an error frame.
pub async fn chat_turn(
    app_state: Arc<AppState>,
    session: &mut ChatSessionState,
    ws_sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    text: String,
) -> PortResult<()> {
    info!("Chat turn started.");

    // The missing credential is fatal at first use, not at startup: the
    // storefront runs without a key, only chat refuses to.
    let Some(chat_adapter) = app_state.chat_adapter.as_ref() else {
        return Err(PortError::Unexpected(
            "Chat is unavailable: the LLM API key is not configured.".to_string(),
        ));
    };

    // The transcript before this turn is what the model gets as context.
    let history: Vec<ChatMessage> = session.transcript.messages().to_vec();
    session.transcript.push_user(&text);
    let turn_id = session.transcript.begin_model_turn();

    let start_msg = ServerMessage::ReplyStarted {
        message_id: turn_id,
    };
    let start_json = serde_json::to_string(&start_msg).unwrap();
    if ws_sender
        .lock()
        .await
        .send(Message::Text(start_json.into()))
        .await
        .is_err()
    {
        return Err(PortError::Unexpected(
            "Failed to send ReplyStarted message.".to_string(),
        ));
    }

    match chat_adapter.stream_reply(&history, &text).await {
        Ok(raw_stream) => {
            let mut fragments = Box::pin(with_fallback(raw_stream));
            while let Some(fragment) = fragments.next().await {
                session.transcript.append_fragment(turn_id, &fragment);
                let frame = ServerMessage::ReplyFragment {
                    message_id: turn_id,
                    text: fragment,
                };
                let frame_json = serde_json::to_string(&frame).unwrap();
                if ws_sender
                    .lock()
                    .await
                    .send(Message::Text(frame_json.into()))
                    .await
                    .is_err()
                {
                    // Client went away mid-stream; the turn is abandoned,
                    // the remote call is simply no longer consumed.
                    warn!("Client disconnected mid-stream; abandoning turn.");
                    session.transcript.finish_model_turn(turn_id);
                    return Ok(());
                }
            }
        }
        Err(e) => {
            // Opening the stream failed: same policy as a mid-stream error.
            warn!("Failed to open reply stream: {e}");
            session.transcript.append_fragment(turn_id, FALLBACK_REPLY);
            let frame = ServerMessage::ReplyFragment {
                message_id: turn_id,
                text: FALLBACK_REPLY.to_string(),
            };
            let frame_json = serde_json::to_string(&frame).unwrap();
            let _ = ws_sender
                .lock()
                .await
                .send(Message::Text(frame_json.into()))
                .await;
        }
    }

    session.transcript.finish_model_turn(turn_id);

    let end_msg = ServerMessage::ReplyComplete {
        message_id: turn_id,
    };
    let end_json = serde_json::to_string(&end_msg).unwrap();
    if ws_sender
        .lock()
        .await
        .send(Message::Text(end_json.into()))
        .await
        .is_err()
    {
        warn!("Failed to send ReplyComplete message. Client may have disconnected.");
    }

    info!("Chat turn finished.");
    Ok(())
}
