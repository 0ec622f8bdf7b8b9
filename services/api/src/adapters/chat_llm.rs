//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the storefront chat assistant.
//! It implements the `ChatAssistantService` port from the `core` crate
//! over a streaming chat-completions call.

const PERSONA_INSTRUCTIONS: &str = r#"You are 'Kavi', the intelligent AI assistant for Kavithedal Publication.
Your goal is to assist customers in discovering books, answering questions about authors and content, solving order-related queries, and generating promotional content.

TONE:
- Warm, literary, knowledgeable, and helpful.
- Use an inviting tone, like a friendly librarian or a passionate bookstore owner.

GUIDELINES:
- If a user asks for book recommendations, ask clarifying questions if needed (e.g., "Do you prefer Fiction or Non-fiction?", "Tamil or English?").
- When recommending a book, mention its Title, Author, and a brief reason why it fits their request.
- If asking about shipping/payments, summarize the policy clearly.
- If asked to write a description or marketing post, be creative and engaging.
- If technical issues arise (e.g., payment failure), advise them to contact support@kavithedal.com.
- If a user wants to buy a book, encourage them to add it to their cart using the 'Add' button."#;

const POLICIES: &str = r#"SHIPPING POLICY:
- We ship worldwide.
- Domestic shipping (India) takes 3-5 business days. Free for orders above ₹500.
- International shipping takes 10-15 business days.
- Tracking number is provided via email within 24 hours of dispatch.

RETURNS & REFUNDS:
- Returns accepted within 7 days of delivery if the book is damaged.
- No returns for 'change of mind'.
- Refunds are processed within 5-7 business days to the original payment method.

PAYMENT GATEWAY:
- We accept Credit/Debit Cards (Visa, Mastercard, Rupay), UPI (GPay, PhonePe), and Net Banking via Razorpay.
- Cash on Delivery (COD) is available for select pin codes in Tamil Nadu and Karnataka.

CONTACT:
- Email: support@kavithedal.com
- Phone: +91-98765-43210 (10 AM - 6 PM IST)"#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use bookstore_core::{
    domain::{Book, ChatMessage, ChatRole, Language},
    ports::{ChatAssistantService, PortError, PortResult, ReplyStream},
};
use futures::StreamExt;
use serde::Serialize;

/// What the assistant is allowed to know about a book: everything except
/// the live stock figure.
#[derive(Serialize)]
struct BookKnowledge<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a str,
    genre: &'a str,
    category: &'a str,
    price: f64,
    description: &'a str,
    cover_url: &'a str,
    pages: u32,
    language: Language,
    isbn: &'a str,
    sold: u32,
}

impl<'a> From<&'a Book> for BookKnowledge<'a> {
    fn from(b: &'a Book) -> Self {
        Self {
            id: &b.id,
            title: &b.title,
            author: &b.author,
            genre: &b.genre,
            category: &b.category,
            price: b.price,
            description: &b.description,
            cover_url: &b.cover_url,
            pages: b.pages,
            language: b.language,
            isbn: &b.isbn,
            sold: b.sold,
        }
    }
}

/// Builds the fixed system instruction: persona, the catalog snapshot
/// (stockless), and the store policies. Taken once at startup.
pub fn system_instruction(catalog: &[Book]) -> String {
    let knowledge: Vec<BookKnowledge> = catalog.iter().map(BookKnowledge::from).collect();
    let catalog_json =
        serde_json::to_string_pretty(&knowledge).unwrap_or_else(|_| "[]".to_string());
    format!(
        "{PERSONA_INSTRUCTIONS}\n\nKNOWLEDGE BASE:\n1. CATALOG: You have access to the following books. Use this to recommend books based on user preferences (genre, language, price, etc.).\n{catalog_json}\n\n2. POLICIES: Use this for operational queries.\n{POLICIES}\n"
    )
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatAssistantService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct LlmChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    system_instruction: String,
}

impl LlmChatAdapter {
    /// Creates a new `LlmChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, system_instruction: String) -> Self {
        Self {
            client,
            model,
            system_instruction,
        }
    }

    /// Replays the transcript into the request message list. The remote API
    /// is stateless, so every send carries the full conversation so far.
    fn build_messages(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> PortResult<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() + 2);
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_instruction.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );
        for turn in history {
            // A still-streaming turn means the caller broke the sequential
            // send discipline; skip it rather than replaying partial text.
            if turn.is_streaming {
                continue;
            }
            let msg: ChatCompletionRequestMessage = match turn.role {
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.text.as_str())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
                ChatRole::Model => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.text.as_str())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
            };
            messages.push(msg);
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );
        Ok(messages)
    }
}

//=========================================================================================
// `ChatAssistantService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatAssistantService for LlmChatAdapter {
    /// Opens a streaming completion for one user turn and maps the provider
    /// chunks down to plain text fragments.
    async fn stream_reply(&self, history: &[ChatMessage], message: &str) -> PortResult<ReplyStream> {
        let messages = self.build_messages(history, message)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(1000u32)
            .stream(true)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error, which respects the orphan rule.
        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let fragments = stream
            .map(|item| match item {
                Ok(chunk) => Ok(chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                    .unwrap_or_default()),
                Err(e) => Err(PortError::Unexpected(e.to_string())),
            })
            .filter(|item| futures::future::ready(!matches!(item, Ok(text) if text.is_empty())));

        Ok(Box::pin(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::chat::ChatTranscript;
    use bookstore_core::fixtures::seed_catalog;

    #[test]
    fn transcript_replay_keeps_order_and_skips_streaming_turns() {
        let adapter = LlmChatAdapter::new(
            Client::with_config(OpenAIConfig::new()),
            "test-model".to_string(),
            "system".to_string(),
        );

        let mut transcript = ChatTranscript::with_welcome();
        transcript.push_user("any Tamil poetry?");
        let turn = transcript.begin_model_turn();
        transcript.append_fragment(turn, "We have");
        transcript.finish_model_turn(turn);
        // A turn abandoned mid-stream must not be replayed.
        transcript.begin_model_turn();

        let messages = adapter
            .build_messages(transcript.messages(), "how much is it?")
            .unwrap();

        // system + welcome + user + completed model turn + new user message
        assert_eq!(messages.len(), 5);
        assert!(matches!(
            messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(
            messages[3],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(
            messages.last(),
            Some(ChatCompletionRequestMessage::User(_))
        ));
    }

    #[test]
    fn system_instruction_excludes_stock_figures() {
        let instruction = system_instruction(&seed_catalog());
        assert!(instruction.contains("The Whispering Banyan"));
        assert!(instruction.contains("SHIPPING POLICY"));
        assert!(!instruction.contains("\"stock\""));
        // Sold counters stay visible, the live stock does not.
        assert!(instruction.contains("\"sold\""));
    }
}
