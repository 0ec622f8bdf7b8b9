//! services/api/src/web/auth.rs
//!
//! Admin login and logout endpoints.
//!
//! This is the original storefront's toy gate, kept verbatim: one secret,
//! one process-wide boolean, no token and no expiry. It is not a security
//! boundary and is documented as such in DESIGN.md.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub is_admin: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /admin/login - Open the admin session.
///
/// Succeeds iff the password matches the configured secret; a failed
/// attempt leaves the session exactly as it was.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut store = state.store.lock().await;
    if store.login_admin(&req.password) {
        info!("Admin session opened.");
        Ok(Json(LoginResponse { is_admin: true }))
    } else {
        Err((StatusCode::UNAUTHORIZED, "Wrong password".to_string()))
    }
}

/// POST /admin/logout - Close the admin session unconditionally.
#[utoipa::path(
    post,
    path = "/admin/logout",
    responses(
        (status = 200, description = "Logout successful")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut store = state.store.lock().await;
    store.logout_admin();
    info!("Admin session closed.");
    Json(LoginResponse { is_admin: false })
}
