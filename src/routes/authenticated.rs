use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Authenticated Router Module
///
/// Session endpoints available to any authenticated admin account,
/// regardless of role. The `AuthUser` extractor middleware on the layer
/// above guarantees every handler here receives a validated identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /api/auth/me
        // The requesting admin's own profile, re-fetched per request.
        .route("/api/auth/me", get(handlers::auth::get_me))
        // PUT /api/auth/change-password
        // Rotates the requester's password after re-verifying the
        // current one.
        .route(
            "/api/auth/change-password",
            put(handlers::auth::change_password),
        )
}
