pub mod chat;
pub mod domain;
pub mod fixtures;
pub mod ports;
pub mod store;

pub use chat::{ChatTranscript, FALLBACK_REPLY, WELCOME_MESSAGE};
pub use domain::{
    Book, BookDraft, BookPatch, CartItem, ChatMessage, ChatRole, CustomerDetails, Language, Order,
    OrderStatus, StoreStats,
};
pub use ports::{ChatAssistantService, MarketingCopyService, PortError, PortResult, ReplyStream};
pub use store::Store;
