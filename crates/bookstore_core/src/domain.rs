//! crates/bookstore_core/src/domain.rs
//!
//! Defines the pure, core data structures for the storefront.
//! These structs are independent of the web layer and of any remote API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The language a book is printed in. The catalog carries only these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Tamil,
    English,
}

/// A single catalog record.
///
/// `stock` and `sold` are the only fields the order engine touches:
/// `stock` never goes below zero, `sold` only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub cover_url: String,
    pub pages: u32,
    pub language: Language,
    pub isbn: String,
    pub stock: u32,
    pub sold: u32,
}

/// Payload for creating a book through the admin surface.
/// The store assigns the id and starts `sold` at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub cover_url: String,
    pub pages: u32,
    pub language: Language,
    pub isbn: String,
    pub stock: u32,
}

/// Partial update for a book; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pages: Option<u32>,
    pub language: Option<Language>,
    pub isbn: Option<String>,
    pub stock: Option<u32>,
}

/// One line of the shopping cart. The book is a denormalized copy, so a
/// later catalog edit or delete never reaches into an existing cart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub book: Book,
    pub quantity: u32,
}

/// Lifecycle states of an order. Transitions are unrestricted: the admin
/// panel may move an order from any status to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

/// Customer details collected at checkout. The store itself performs no
/// validation on these; the web layer rejects blank fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

/// A placed order. `items` is a value snapshot of the cart at placement
/// time; everything except `status` is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_method: String,
    pub date: DateTime<Utc>,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of the chat transcript. A model turn is created empty with
/// `is_streaming = true` and grows in place as fragments arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_streaming: bool,
}

/// Aggregates shown on the admin dashboard, derived from orders + catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub books_sold: u32,
    pub low_stock_count: usize,
}
