//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! These handlers play the role the storefront UI played originally: they
//! perform the presence checks and gating the UI did, while the store itself
//! stays permissive (see DESIGN.md).

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bookstore_core::domain::{
    Book, BookDraft, BookPatch, CustomerDetails, Language, Order, OrderStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books_handler,
        add_book_handler,
        update_book_handler,
        delete_book_handler,
        get_cart_handler,
        add_to_cart_handler,
        remove_from_cart_handler,
        clear_cart_handler,
        place_order_handler,
        list_orders_handler,
        update_order_status_handler,
        stats_handler,
        marketing_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
    ),
    components(
        schemas(
            crate::web::auth::LoginRequest,
            crate::web::auth::LoginResponse,
            AddBookRequest,
            UpdateBookRequest,
            AddToCartRequest,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            MarketingRequest,
            MarketingResponse,
        )
    ),
    tags(
        (name = "Kavithedal Storefront API", description = "API endpoints for the book-store storefront and its admin back-office.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Payload Structs
//=========================================================================================

/// Payload for creating a book through the admin surface.
#[derive(Deserialize, ToSchema)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub cover_url: String,
    pub pages: u32,
    /// "Tamil" or "English".
    pub language: String,
    pub isbn: String,
    pub stock: u32,
}

/// Partial update for a book; absent fields are left untouched.
#[derive(Deserialize, Default, ToSchema)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pages: Option<u32>,
    /// "Tamil" or "English".
    pub language: Option<String>,
    pub isbn: Option<String>,
    pub stock: Option<u32>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub book_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub name: String,
    pub email: String,
    pub payment_method: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// "Pending", "Shipped", "Delivered" or "Cancelled".
    pub status: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MarketingRequest {
    pub topic: String,
}

#[derive(Serialize, ToSchema)]
pub struct MarketingResponse {
    pub copy: String,
}

fn parse_language(value: &str) -> Result<Language, (StatusCode, String)> {
    match value {
        "Tamil" => Ok(Language::Tamil),
        "English" => Ok(Language::English),
        other => Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown language '{other}'; expected 'Tamil' or 'English'"),
        )),
    }
}

fn parse_status(value: &str) -> Result<OrderStatus, (StatusCode, String)> {
    match value {
        "Pending" => Ok(OrderStatus::Pending),
        "Shipped" => Ok(OrderStatus::Shipped),
        "Delivered" => Ok(OrderStatus::Delivered),
        "Cancelled" => Ok(OrderStatus::Cancelled),
        other => Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown order status '{other}'"),
        )),
    }
}

//=========================================================================================
// Catalog Handlers
//=========================================================================================

/// List the full catalog.
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "The current catalog of books")
    )
)]
pub async fn list_books_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = app_state.store.lock().await;
    Json(store.books().to_vec())
}

/// Add a new book to the catalog (admin).
#[utoipa::path(
    post,
    path = "/admin/books",
    request_body = AddBookRequest,
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Admin session required")
    )
)]
pub async fn add_book_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = parse_language(&req.language)?;
    let draft = BookDraft {
        title: req.title,
        author: req.author,
        genre: req.genre,
        category: req.category,
        price: req.price,
        description: req.description,
        cover_url: req.cover_url,
        pages: req.pages,
        language,
        isbn: req.isbn,
        stock: req.stock,
    };
    let mut store = app_state.store.lock().await;
    let book = store.add_book(draft);
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update fields of an existing book (admin). Unknown ids are a no-op.
#[utoipa::path(
    put,
    path = "/admin/books/{id}",
    request_body = UpdateBookRequest,
    responses(
        (status = 204, description = "Patch applied (or silently ignored for an unknown id)"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Admin session required")
    ),
    params(
        ("id" = String, Path, description = "The book id")
    )
)]
pub async fn update_book_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let language = req.language.as_deref().map(parse_language).transpose()?;
    let patch = BookPatch {
        title: req.title,
        author: req.author,
        genre: req.genre,
        category: req.category,
        price: req.price,
        description: req.description,
        cover_url: req.cover_url,
        pages: req.pages,
        language,
        isbn: req.isbn,
        stock: req.stock,
    };
    let mut store = app_state.store.lock().await;
    store.update_book(&id, patch);
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book from the catalog (admin). Historical orders keep their
/// snapshot of it.
#[utoipa::path(
    delete,
    path = "/admin/books/{id}",
    responses(
        (status = 204, description = "Book removed (or silently ignored for an unknown id)"),
        (status = 401, description = "Admin session required")
    ),
    params(
        ("id" = String, Path, description = "The book id")
    )
)]
pub async fn delete_book_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut store = app_state.store.lock().await;
    store.delete_book(&id);
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Cart Handlers
//=========================================================================================

/// Read the current cart.
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "The current cart contents")
    )
)]
pub async fn get_cart_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = app_state.store.lock().await;
    Json(store.cart().to_vec())
}

/// Add one copy of a book to the cart; repeated adds merge by quantity.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "The cart after the add"),
        (status = 404, description = "No such book in the catalog")
    )
)]
pub async fn add_to_cart_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut store = app_state.store.lock().await;
    let book: Book = store
        .books()
        .iter()
        .find(|b| b.id == req.book_id)
        .cloned()
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("No book with id '{}'", req.book_id),
            )
        })?;
    store.add_to_cart(book);
    Ok(Json(store.cart().to_vec()))
}

/// Remove a cart entry outright. Removing an absent entry is a no-op.
#[utoipa::path(
    delete,
    path = "/cart/items/{book_id}",
    responses(
        (status = 200, description = "The cart after the removal")
    ),
    params(
        ("book_id" = String, Path, description = "The book id of the entry to drop")
    )
)]
pub async fn remove_from_cart_handler(
    State(app_state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    let mut store = app_state.store.lock().await;
    store.remove_from_cart(&book_id);
    Json(store.cart().to_vec())
}

/// Empty the cart.
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 204, description = "Cart emptied")
    )
)]
pub async fn clear_cart_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut store = app_state.store.lock().await;
    store.clear_cart();
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Order Handlers
//=========================================================================================

/// Place an order from the current cart.
///
/// The presence checks the original checkout modal performed live here:
/// blank customer fields and an empty cart are rejected before the store
/// is touched.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "The newly placed order"),
        (status = 400, description = "Blank customer fields or empty cart")
    )
)]
pub async fn place_order_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>), (StatusCode, String)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Customer name and email are required".to_string(),
        ));
    }

    let mut store = app_state.store.lock().await;
    if store.cart().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Cart is empty".to_string()));
    }

    let order = store
        .place_order(
            CustomerDetails {
                name: req.name,
                email: req.email,
            },
            &req.payment_method,
        )
        .clone();
    Ok((StatusCode::CREATED, Json(order)))
}

/// List all orders, most recent first (admin).
#[utoipa::path(
    get,
    path = "/admin/orders",
    responses(
        (status = 200, description = "All orders, most recent first"),
        (status = 401, description = "Admin session required")
    )
)]
pub async fn list_orders_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = app_state.store.lock().await;
    Json(store.orders().to_vec())
}

/// Overwrite an order's status (admin). Any transition is legal; unknown
/// ids are a no-op.
#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 204, description = "Status applied (or silently ignored for an unknown id)"),
        (status = 400, description = "Unknown status value"),
        (status = 401, description = "Admin session required")
    ),
    params(
        ("id" = String, Path, description = "The order id")
    )
)]
pub async fn update_order_status_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let status = parse_status(&req.status)?;
    let mut store = app_state.store.lock().await;
    store.update_order_status(&id, status);
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Admin Dashboard Handlers
//=========================================================================================

/// Dashboard aggregates: revenue, order count, books sold, low-stock count.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Current dashboard aggregates"),
        (status = 401, description = "Admin session required")
    )
)]
pub async fn stats_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = app_state.store.lock().await;
    Json(store.stats())
}

/// Generate a short promotional social-media post (admin).
#[utoipa::path(
    post,
    path = "/admin/marketing",
    request_body = MarketingRequest,
    responses(
        (status = 200, description = "The generated copy", body = MarketingResponse),
        (status = 401, description = "Admin session required"),
        (status = 503, description = "No LLM API key configured")
    )
)]
pub async fn marketing_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<MarketingRequest>,
) -> Result<Json<MarketingResponse>, (StatusCode, String)> {
    // Without a key this feature is down; the rest of the storefront is not.
    let Some(adapter) = app_state.marketing_adapter.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "The LLM API key is not configured.".to_string(),
        ));
    };

    // Remote failures collapse to a fixed string, mirroring the chat
    // failure policy: the caller sees content either way.
    let copy = match adapter.generate_marketing_copy(&req.topic).await {
        Ok(copy) => copy,
        Err(e) => {
            error!("Failed to generate marketing copy: {:?}", e);
            "Error generating marketing copy.".to_string()
        }
    };
    Ok(Json(MarketingResponse { copy }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use bookstore_core::fixtures::seed_catalog;
    use bookstore_core::ports::{MarketingCopyService, PortError, PortResult};
    use bookstore_core::store::Store;
    use tokio::sync::Mutex;
    use tracing::Level;

    /// A marketing service whose provider is always down.
    struct FailingMarketing;

    #[async_trait]
    impl MarketingCopyService for FailingMarketing {
        async fn generate_marketing_copy(&self, _topic: &str) -> PortResult<String> {
            Err(PortError::Unexpected("connection refused".to_string()))
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: Level::INFO,
            llm_api_key: None,
            llm_api_base: None,
            chat_model: "test-model".to_string(),
            marketing_model: "test-model".to_string(),
            admin_password: "admin123".to_string(),
        }
    }

    fn test_state(marketing: Option<Arc<dyn MarketingCopyService>>) -> Arc<AppState> {
        Arc::new(AppState {
            store: Arc::new(Mutex::new(Store::seeded(
                "admin123",
                seed_catalog(),
                Vec::new(),
            ))),
            config: Arc::new(test_config()),
            chat_adapter: None,
            marketing_adapter: marketing,
        })
    }

    fn order_request(name: &str, email: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            name: name.to_string(),
            email: email.to_string(),
            payment_method: "Credit Card".to_string(),
        }
    }

    #[tokio::test]
    async fn checkout_rejects_blank_customer_fields() {
        let state = test_state(None);
        {
            let mut store = state.store.lock().await;
            let book = store.books()[0].clone();
            store.add_to_cart(book);
        }

        for (name, email) in [("", "a@b.com"), ("   ", "a@b.com"), ("Priya", ""), ("Priya", "  ")] {
            let result =
                place_order_handler(State(state.clone()), Json(order_request(name, email))).await;
            let (status, _) = result.err().unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        // The rejected attempts must not have consumed the cart or placed anything.
        let store = state.store.lock().await;
        assert_eq!(store.cart().len(), 1);
        assert!(store.orders().is_empty());
    }

    #[tokio::test]
    async fn checkout_rejects_empty_cart() {
        let state = test_state(None);

        let result =
            place_order_handler(State(state.clone()), Json(order_request("Priya", "p@x.com")))
                .await;
        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Cart is empty");
    }

    #[tokio::test]
    async fn checkout_places_order_and_clears_cart() {
        let state = test_state(None);
        {
            let mut store = state.store.lock().await;
            let book = store.books()[0].clone();
            store.add_to_cart(book);
        }

        let result =
            place_order_handler(State(state.clone()), Json(order_request("Priya", "p@x.com")))
                .await;
        let (status, Json(order)) = result.ok().unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order.customer_name, "Priya");

        let store = state.store.lock().await;
        assert!(store.cart().is_empty());
        assert_eq!(store.orders().len(), 1);
        assert_eq!(store.orders()[0].id, order.id);
    }

    #[tokio::test]
    async fn marketing_failure_collapses_to_fixed_copy() {
        let state = test_state(Some(Arc::new(FailingMarketing)));

        let result = marketing_handler(
            State(state),
            Json(MarketingRequest {
                topic: "new Tamil poetry arrivals".to_string(),
            }),
        )
        .await;
        let Json(response) = result.ok().unwrap();
        assert_eq!(response.copy, "Error generating marketing copy.");
    }

    #[tokio::test]
    async fn marketing_without_api_key_is_unavailable() {
        let state = test_state(None);

        let result = marketing_handler(
            State(state),
            Json(MarketingRequest {
                topic: "anything".to_string(),
            }),
        )
        .await;
        let (status, _) = result.err().unwrap();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
