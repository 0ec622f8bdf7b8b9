//! services/api/src/web/middleware.rs
//!
//! The admin gate for protecting mutation routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Middleware that rejects requests while the admin session is closed.
///
/// The store's mutation methods carry no authorization themselves; this
/// gate is the only enforcement point, matching the original design where
/// the UI gated the admin panel.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let is_admin = state.store.lock().await.is_admin();
    if !is_admin {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}
