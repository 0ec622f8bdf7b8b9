//! services/api/src/web/state.rs
//!
//! Defines the application's shared and per-connection states.

use crate::config::Config;
use bookstore_core::{
    chat::ChatTranscript,
    ports::{ChatAssistantService, MarketingCopyService},
    store::Store,
};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The store sits behind a single mutex: the storefront models exactly one
/// logical user session, so all mutation is single-writer by construction.
///
/// The LLM adapters are absent when no API key was configured: the
/// storefront keeps running and only the chat/marketing features report
/// the missing credential, at first use.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub config: Arc<Config>,
    pub chat_adapter: Option<Arc<dyn ChatAssistantService>>,
    pub marketing_adapter: Option<Arc<dyn MarketingCopyService>>,
}

//=========================================================================================
// ChatSessionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active chat connection: the conversation
/// transcript, lazily opened with the assistant's greeting.
pub struct ChatSessionState {
    pub transcript: ChatTranscript,
}

impl ChatSessionState {
    pub fn new() -> Self {
        Self {
            transcript: ChatTranscript::with_welcome(),
        }
    }
}

impl Default for ChatSessionState {
    fn default() -> Self {
        Self::new()
    }
}
