//! crates/bookstore_core/src/chat.rs
//!
//! The chat transcript state machine and the failure policy for streamed
//! replies. One transcript exists per conversation; turns are strictly
//! sequential and each model turn moves idle -> streaming -> complete.

use chrono::Utc;
use futures::{Stream, StreamExt};
use uuid::Uuid;

use crate::domain::{ChatMessage, ChatRole};
use crate::ports::ReplyStream;

/// Shown to the user in place of whatever the transport failed to deliver.
/// Deliberately indistinguishable from genuine model output; see DESIGN.md.
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble connecting to the library archives right now. Please try again in a moment.";

/// The greeting the assistant opens every conversation with.
pub const WELCOME_MESSAGE: &str = "Hello! I'm Kavi, your Kavithedal assistant. How can I help you discover your next great read today?";

/// An append-only conversation log. The only in-place mutation allowed is
/// growing the text of the currently streaming model turn.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened with the standard assistant greeting.
    pub fn with_welcome() -> Self {
        let mut transcript = Self::new();
        transcript.push(ChatRole::Model, WELCOME_MESSAGE, false);
        transcript
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a model turn is currently streaming.
    pub fn is_streaming(&self) -> bool {
        self.messages.last().is_some_and(|m| m.is_streaming)
    }

    /// Appends a completed user turn.
    pub fn push_user(&mut self, text: &str) -> Uuid {
        self.push(ChatRole::User, text, false)
    }

    /// Opens a model turn: an empty message flagged as streaming.
    pub fn begin_model_turn(&mut self) -> Uuid {
        self.push(ChatRole::Model, "", true)
    }

    /// Grows the streaming model turn by one fragment, in arrival order.
    /// A no-op if `id` does not name a currently streaming message.
    pub fn append_fragment(&mut self, id: Uuid, fragment: &str) {
        if let Some(msg) = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.is_streaming)
        {
            msg.text.push_str(fragment);
        }
    }

    /// Marks the model turn complete; its text is frozen from here on.
    pub fn finish_model_turn(&mut self, id: Uuid) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
            msg.is_streaming = false;
        }
    }

    fn push(&mut self, role: ChatRole, text: &str, is_streaming: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.messages.push(ChatMessage {
            id,
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
            is_streaming,
        });
        id
    }
}

/// Wraps a raw reply stream with the storefront failure policy: the first
/// transport error yields [`FALLBACK_REPLY`] as the final fragment and ends
/// the stream. The error itself is swallowed; callers see only text.
pub fn with_fallback(mut inner: ReplyStream) -> impl Stream<Item = String> + Send {
    async_stream::stream! {
        while let Some(item) = inner.next().await {
            match item {
                Ok(fragment) => yield fragment,
                Err(_) => {
                    yield FALLBACK_REPLY.to_string();
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;
    use futures::stream;

    #[test]
    fn turn_moves_from_streaming_to_complete() {
        let mut transcript = ChatTranscript::with_welcome();
        assert_eq!(transcript.messages().len(), 1);
        assert!(!transcript.is_streaming());

        transcript.push_user("hello");
        let turn = transcript.begin_model_turn();
        assert!(transcript.is_streaming());

        transcript.append_fragment(turn, "Hi ");
        transcript.append_fragment(turn, "there!");
        transcript.finish_model_turn(turn);

        let last = transcript.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Model);
        assert_eq!(last.text, "Hi there!");
        assert!(!last.is_streaming);
        assert!(!transcript.is_streaming());
    }

    #[test]
    fn fragments_only_land_on_the_streaming_turn() {
        let mut transcript = ChatTranscript::new();
        let turn = transcript.begin_model_turn();
        transcript.finish_model_turn(turn);
        transcript.append_fragment(turn, "late fragment");
        assert_eq!(transcript.messages()[0].text, "");
    }

    #[tokio::test]
    async fn mid_stream_error_yields_fallback_then_ends() {
        // Stubbed transport: two fragments, then a failure.
        let raw: ReplyStream = Box::pin(stream::iter(vec![
            Ok("Hi ".to_string()),
            Ok("the".to_string()),
            Err(PortError::Unexpected("connection reset".to_string())),
            Ok("never delivered".to_string()),
        ]));

        let fragments: Vec<String> = with_fallback(raw).collect().await;
        let joined = fragments.concat();
        assert!(joined.starts_with("Hi the"));
        assert!(joined.ends_with(FALLBACK_REPLY));
        assert_eq!(fragments.len(), 3);
    }

    #[tokio::test]
    async fn clean_stream_passes_through_unchanged() {
        let raw: ReplyStream = Box::pin(stream::iter(vec![
            Ok("All ".to_string()),
            Ok("good.".to_string()),
        ]));
        let fragments: Vec<String> = with_fallback(raw).collect().await;
        assert_eq!(fragments.concat(), "All good.");
    }
}
