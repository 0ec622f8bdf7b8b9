//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{chat_llm, LlmChatAdapter, LlmMarketingAdapter},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler},
        middleware::require_admin,
        rest::{
            add_book_handler, add_to_cart_handler, clear_cart_handler, delete_book_handler,
            get_cart_handler, list_books_handler, list_orders_handler, marketing_handler,
            place_order_handler, remove_from_cart_handler, stats_handler, update_book_handler,
            update_order_status_handler, ApiDoc,
        },
        state::AppState,
        ws_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use bookstore_core::{
    fixtures,
    ports::{ChatAssistantService, MarketingCopyService},
    store::Store,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Seed the In-Memory Store ---
    // All state is ephemeral: the catalog and order history reset on restart.
    let store = Arc::new(Mutex::new(Store::seeded(
        config.admin_password.clone(),
        fixtures::seed_catalog(),
        fixtures::seed_orders(),
    )));

    // --- 3. Initialize LLM Adapters ---
    // A missing key only disables the chat/marketing features; the rest of
    // the storefront keeps running and the credential failure surfaces at
    // first use of those endpoints.
    let (chat_adapter, marketing_adapter) = match &config.llm_api_key {
        Some(api_key) => {
            let mut llm_config = OpenAIConfig::new().with_api_key(api_key.clone());
            if let Some(api_base) = &config.llm_api_base {
                llm_config = llm_config.with_api_base(api_base.clone());
            }
            let llm_client = Client::with_config(llm_config);

            // The assistant's knowledge base is a startup snapshot of the
            // catalog, as it was in the original storefront.
            let instruction = {
                let store = store.lock().await;
                chat_llm::system_instruction(store.books())
            };
            let chat_adapter: Arc<dyn ChatAssistantService> = Arc::new(LlmChatAdapter::new(
                llm_client.clone(),
                config.chat_model.clone(),
                instruction,
            ));
            let marketing_adapter: Arc<dyn MarketingCopyService> = Arc::new(
                LlmMarketingAdapter::new(llm_client, config.marketing_model.clone()),
            );
            (Some(chat_adapter), Some(marketing_adapter))
        }
        None => {
            warn!("LLM_API_KEY is not set; chat and marketing features are disabled.");
            (None, None)
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
        chat_adapter,
        marketing_adapter,
    });

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public storefront routes (no admin session required)
    let public_routes = Router::new()
        .route("/books", get(list_books_handler))
        .route("/cart", get(get_cart_handler).delete(clear_cart_handler))
        .route("/cart/items", post(add_to_cart_handler))
        .route("/cart/items/{book_id}", delete(remove_from_cart_handler))
        .route("/orders", post(place_order_handler))
        .route("/admin/login", post(login_handler))
        .route("/admin/logout", post(logout_handler))
        .route("/ws/chat", get(ws_handler));

    // Back-office routes (admin session required)
    let admin_routes = Router::new()
        .route("/admin/books", post(add_book_handler))
        .route(
            "/admin/books/{id}",
            put(update_book_handler).delete(delete_book_handler),
        )
        .route("/admin/orders", get(list_orders_handler))
        .route("/admin/orders/{id}/status", put(update_order_status_handler))
        .route("/admin/stats", get(stats_handler))
        .route("/admin/marketing", post(marketing_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
