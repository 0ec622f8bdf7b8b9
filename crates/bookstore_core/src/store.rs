//! crates/bookstore_core/src/store.rs
//!
//! The in-memory state container for the storefront: catalog, cart, orders
//! and the admin session flag, together with every operation that mutates
//! them. There is no persistence; all state dies with the process.
//!
//! The container is explicit (no globals): the web layer constructs one and
//! shares it behind a lock, preserving single-writer semantics.

use chrono::Utc;

use crate::domain::{
    Book, BookDraft, BookPatch, CartItem, CustomerDetails, Order, OrderStatus, StoreStats,
};

/// Books with fewer than this many copies in stock count as "low stock"
/// on the admin dashboard.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// The whole mutable state of one storefront session.
#[derive(Debug, Default)]
pub struct Store {
    books: Vec<Book>,
    orders: Vec<Order>,
    cart: Vec<CartItem>,
    is_admin: bool,
    admin_password: String,
    // Millisecond clock of the last generated id, forced strictly monotonic
    // so rapid successive placements never collide.
    last_id_millis: i64,
}

impl Store {
    /// Creates a store with the given admin secret and no catalog.
    pub fn new(admin_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            ..Self::default()
        }
    }

    /// Creates a store pre-seeded with catalog and order fixtures.
    pub fn seeded(admin_password: impl Into<String>, books: Vec<Book>, orders: Vec<Order>) -> Self {
        Self {
            books,
            orders,
            admin_password: admin_password.into(),
            ..Self::default()
        }
    }

    //=====================================================================================
    // Read access
    //=====================================================================================

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// The aggregates shown on the admin dashboard. Always recomputed from
    /// the current orders and catalog, never cached.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_revenue: self.orders.iter().map(|o| o.total_amount).sum(),
            total_orders: self.orders.len(),
            books_sold: self
                .orders
                .iter()
                .flat_map(|o| o.items.iter())
                .map(|i| i.quantity)
                .sum(),
            low_stock_count: self
                .books
                .iter()
                .filter(|b| b.stock < LOW_STOCK_THRESHOLD)
                .count(),
        }
    }

    //=====================================================================================
    // Cart engine
    //=====================================================================================

    /// Adds one copy of `book` to the cart. If an entry for the same book id
    /// already exists its quantity is incremented; the cart never holds two
    /// entries for one id. Remaining stock is deliberately not checked here.
    pub fn add_to_cart(&mut self, book: Book) {
        if let Some(item) = self.cart.iter_mut().find(|i| i.book.id == book.id) {
            item.quantity += 1;
        } else {
            self.cart.push(CartItem { book, quantity: 1 });
        }
    }

    /// Removes the whole entry for `book_id` (not a decrement-by-one).
    /// A no-op if the entry is absent.
    pub fn remove_from_cart(&mut self, book_id: &str) {
        self.cart.retain(|i| i.book.id != book_id);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    //=====================================================================================
    // Order engine
    //=====================================================================================

    /// Converts the current cart into a new order.
    ///
    /// The total is recomputed from the live cart, the items are snapshotted
    /// by value, stock is decremented (floored at zero) and sold counters
    /// incremented for every book in the cart, and the cart is cleared. The
    /// new order is prepended: callers observe most-recent-first ordering.
    ///
    /// An empty cart yields a zero-amount order with no items; guarding
    /// against that is the caller's job, as it was in the original UI.
    pub fn place_order(&mut self, customer: CustomerDetails, payment_method: &str) -> &Order {
        let total_amount: f64 = self
            .cart
            .iter()
            .map(|i| i.book.price * f64::from(i.quantity))
            .sum();

        for item in &self.cart {
            if let Some(book) = self.books.iter_mut().find(|b| b.id == item.book.id) {
                book.stock = book.stock.saturating_sub(item.quantity);
                book.sold += item.quantity;
            }
        }

        let order = Order {
            id: format!("ORD-{}", self.next_id_millis()),
            customer_name: customer.name,
            customer_email: customer.email,
            items: self.cart.clone(),
            total_amount,
            status: OrderStatus::Pending,
            payment_method: payment_method.to_string(),
            date: Utc::now(),
        };

        self.orders.insert(0, order);
        self.cart.clear();
        &self.orders[0]
    }

    /// Overwrites the status of the matching order. Any transition is legal;
    /// an unknown id is a silent no-op.
    pub fn update_order_status(&mut self, id: &str, status: OrderStatus) {
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == id) {
            order.status = status;
        }
    }

    //=====================================================================================
    // Catalog mutation (admin surface; the gate lives in the web layer)
    //=====================================================================================

    /// Adds a new book with a fresh id and a zero sold counter, returning it.
    pub fn add_book(&mut self, draft: BookDraft) -> Book {
        let book = Book {
            id: format!("b{}", self.next_id_millis()),
            title: draft.title,
            author: draft.author,
            genre: draft.genre,
            category: draft.category,
            price: draft.price,
            description: draft.description,
            cover_url: draft.cover_url,
            pages: draft.pages,
            language: draft.language,
            isbn: draft.isbn,
            stock: draft.stock,
            sold: 0,
        };
        self.books.push(book.clone());
        book
    }

    /// Shallow-merges the patch into the matching book; no-op on unknown id.
    pub fn update_book(&mut self, id: &str, patch: BookPatch) {
        let Some(book) = self.books.iter_mut().find(|b| b.id == id) else {
            return;
        };
        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        if let Some(genre) = patch.genre {
            book.genre = genre;
        }
        if let Some(category) = patch.category {
            book.category = category;
        }
        if let Some(price) = patch.price {
            book.price = price;
        }
        if let Some(description) = patch.description {
            book.description = description;
        }
        if let Some(cover_url) = patch.cover_url {
            book.cover_url = cover_url;
        }
        if let Some(pages) = patch.pages {
            book.pages = pages;
        }
        if let Some(language) = patch.language {
            book.language = language;
        }
        if let Some(isbn) = patch.isbn {
            book.isbn = isbn;
        }
        if let Some(stock) = patch.stock {
            book.stock = stock;
        }
    }

    /// Removes the matching book outright. Orders keep their snapshots, so
    /// there is no referential check against order history.
    pub fn delete_book(&mut self, id: &str) {
        self.books.retain(|b| b.id != id);
    }

    //=====================================================================================
    // Admin session gate
    //=====================================================================================

    /// Opens the admin session iff `password` matches the configured secret.
    /// Returns whether the login succeeded; a failed attempt leaves the
    /// session untouched.
    pub fn login_admin(&mut self, password: &str) -> bool {
        if password == self.admin_password {
            self.is_admin = true;
            true
        } else {
            false
        }
    }

    pub fn logout_admin(&mut self) {
        self.is_admin = false;
    }

    //=====================================================================================
    // Id generation
    //=====================================================================================

    /// Millisecond timestamp bumped past the previously issued one, so ids
    /// stay unique even across calls within the same millisecond.
    fn next_id_millis(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let ts = now.max(self.last_id_millis + 1);
        self.last_id_millis = ts;
        ts
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;

    fn book(id: &str, price: f64, stock: u32) -> Book {
        Book {
            id: id.to_string(),
            title: format!("Book {id}"),
            author: "Author".to_string(),
            genre: "Fiction".to_string(),
            category: "Fiction".to_string(),
            price,
            description: String::new(),
            cover_url: String::new(),
            pages: 100,
            language: Language::English,
            isbn: String::new(),
            stock,
            sold: 0,
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "R".to_string(),
            email: "r@example.com".to_string(),
        }
    }

    fn store_with(books: Vec<Book>) -> Store {
        Store::seeded("admin123", books, Vec::new())
    }

    #[test]
    fn repeated_add_merges_into_one_entry() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        let b = store.books()[0].clone();
        for _ in 0..4 {
            store.add_to_cart(b.clone());
        }
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 4);
    }

    #[test]
    fn add_to_cart_ignores_stock() {
        // Known design gap, preserved: the cart may request more than stock.
        let mut store = store_with(vec![book("b1", 100.0, 1)]);
        let b = store.books()[0].clone();
        for _ in 0..3 {
            store.add_to_cart(b.clone());
        }
        assert_eq!(store.cart()[0].quantity, 3);
    }

    #[test]
    fn remove_from_cart_is_idempotent() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        let b = store.books()[0].clone();
        store.add_to_cart(b);
        store.remove_from_cart("b1");
        store.remove_from_cart("b1");
        assert!(store.cart().is_empty());
    }

    #[test]
    fn place_order_computes_total_and_updates_counters() {
        // Scenario: (A, 450, qty 1) + (B, 200, qty 2) => 850 total.
        let mut store = store_with(vec![book("a", 450.0, 45), book("b", 200.0, 3)]);
        let a = store.books()[0].clone();
        let b = store.books()[1].clone();
        store.add_to_cart(a);
        store.add_to_cart(b.clone());
        store.add_to_cart(b);

        let order = store.place_order(customer(), "upi").clone();
        assert_eq!(order.total_amount, 850.0);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_name, "R");

        assert_eq!(store.books()[0].stock, 44);
        assert_eq!(store.books()[0].sold, 1);
        assert_eq!(store.books()[1].stock, 1);
        assert_eq!(store.books()[1].sold, 2);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn place_order_floors_stock_at_zero() {
        let mut store = store_with(vec![book("b1", 100.0, 1)]);
        let b = store.books()[0].clone();
        store.add_to_cart(b.clone());
        store.add_to_cart(b.clone());
        store.add_to_cart(b);
        store.place_order(customer(), "cod");
        assert_eq!(store.books()[0].stock, 0);
        assert_eq!(store.books()[0].sold, 3);
    }

    #[test]
    fn place_order_leaves_other_books_untouched() {
        let mut store = store_with(vec![book("b1", 100.0, 5), book("b2", 50.0, 7)]);
        let b1 = store.books()[0].clone();
        store.add_to_cart(b1);
        store.place_order(customer(), "upi");
        assert_eq!(store.books()[1].stock, 7);
        assert_eq!(store.books()[1].sold, 0);
    }

    #[test]
    fn orders_are_most_recent_first() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        let b = store.books()[0].clone();
        store.add_to_cart(b.clone());
        let first = store.place_order(customer(), "upi").id.clone();
        store.add_to_cart(b);
        let second = store.place_order(customer(), "upi").id.clone();
        assert_eq!(store.orders()[0].id, second);
        assert_eq!(store.orders()[1].id, first);
    }

    #[test]
    fn rapid_orders_get_unique_ids() {
        let mut store = store_with(vec![book("b1", 100.0, 100)]);
        let b = store.books()[0].clone();
        let mut ids = Vec::new();
        for _ in 0..20 {
            store.add_to_cart(b.clone());
            ids.push(store.place_order(customer(), "upi").id.clone());
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn empty_cart_order_is_zero_amount_not_rejected() {
        // Preserved behavior: the engine does not guard the empty cart.
        let mut store = store_with(Vec::new());
        let order = store.place_order(customer(), "upi").clone();
        assert_eq!(order.total_amount, 0.0);
        assert!(order.items.is_empty());
    }

    #[test]
    fn order_snapshot_survives_catalog_delete() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        let b = store.books()[0].clone();
        store.add_to_cart(b);
        store.place_order(customer(), "upi");
        store.delete_book("b1");
        assert!(store.books().is_empty());
        assert_eq!(store.orders()[0].items[0].book.id, "b1");
    }

    #[test]
    fn update_order_status_unknown_id_is_noop() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        let b = store.books()[0].clone();
        store.add_to_cart(b);
        store.place_order(customer(), "upi");
        let before = store.orders().len();
        store.update_order_status("ORD-nope", OrderStatus::Shipped);
        assert_eq!(store.orders().len(), before);
        assert_eq!(store.orders()[0].status, OrderStatus::Pending);
    }

    #[test]
    fn update_order_status_allows_any_transition() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        let b = store.books()[0].clone();
        store.add_to_cart(b);
        let id = store.place_order(customer(), "upi").id.clone();
        store.update_order_status(&id, OrderStatus::Delivered);
        store.update_order_status(&id, OrderStatus::Pending);
        assert_eq!(store.orders()[0].status, OrderStatus::Pending);
    }

    #[test]
    fn add_book_assigns_id_and_zero_sold() {
        let mut store = store_with(Vec::new());
        let draft = BookDraft {
            title: "New".to_string(),
            author: "A".to_string(),
            genre: "G".to_string(),
            category: "Fiction".to_string(),
            price: 10.0,
            description: String::new(),
            cover_url: String::new(),
            pages: 1,
            language: Language::Tamil,
            isbn: String::new(),
            stock: 5,
        };
        let added = store.add_book(draft);
        assert!(added.id.starts_with('b'));
        assert_eq!(added.sold, 0);
        assert_eq!(store.books().len(), 1);
    }

    #[test]
    fn update_book_merges_patch_fields() {
        let mut store = store_with(vec![book("b1", 100.0, 10)]);
        store.update_book(
            "b1",
            BookPatch {
                price: Some(120.0),
                stock: Some(2),
                ..BookPatch::default()
            },
        );
        assert_eq!(store.books()[0].price, 120.0);
        assert_eq!(store.books()[0].stock, 2);
        assert_eq!(store.books()[0].pages, 100);

        // Unknown id: silent no-op.
        store.update_book("nope", BookPatch::default());
        assert_eq!(store.books().len(), 1);
    }

    #[test]
    fn login_gate_opens_only_on_matching_secret() {
        let mut store = store_with(Vec::new());
        assert!(!store.login_admin("wrong"));
        assert!(!store.is_admin());
        assert!(store.login_admin("admin123"));
        assert!(store.is_admin());
        store.logout_admin();
        assert!(!store.is_admin());
    }

    #[test]
    fn stats_aggregate_orders_and_low_stock() {
        let mut store = store_with(vec![book("b1", 450.0, 45), book("b2", 200.0, 3)]);
        let b1 = store.books()[0].clone();
        let b2 = store.books()[1].clone();
        store.add_to_cart(b1);
        store.add_to_cart(b2.clone());
        store.add_to_cart(b2);
        store.place_order(customer(), "upi");

        let stats = store.stats();
        assert_eq!(stats.total_revenue, 850.0);
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.books_sold, 3);
        // b2 dropped from 3 to 1 copies, b1 stays at 44.
        assert_eq!(stats.low_stock_count, 1);
    }
}
