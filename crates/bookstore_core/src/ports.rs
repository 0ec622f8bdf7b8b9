//! crates/bookstore_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the specific remote completion API in use.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::ChatMessage;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the remote service.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// A pinned, boxed stream of reply fragments as they arrive from the model.
pub type ReplyStream = Pin<Box<dyn Stream<Item = PortResult<String>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ChatAssistantService: Send + Sync {
    /// Streams the model's reply to `message`, given the prior transcript.
    ///
    /// Fragments must be yielded strictly in arrival order. Callers drain the
    /// stream fully before issuing another send for the same conversation.
    async fn stream_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> PortResult<ReplyStream>;
}

#[async_trait]
pub trait MarketingCopyService: Send + Sync {
    /// Generates a short promotional social-media post about `topic`.
    async fn generate_marketing_copy(&self, topic: &str) -> PortResult<String>;
}
