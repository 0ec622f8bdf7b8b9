pub mod chat_llm;
pub mod marketing_llm;

pub use chat_llm::LlmChatAdapter;
pub use marketing_llm::LlmMarketingAdapter;
