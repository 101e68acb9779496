use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Every mutation of site content and admin accounts. The whole router is
/// wrapped by the authentication middleware; the role gate (`admin` for
/// content writes, `super_admin` for account management) is enforced
/// inside each handler via `AuthUser::require`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Versioned content sections ---
        // POST /api/{kind}
        // Publishes a new version: all existing versions of the section
        // are retired and the new document becomes the active one.
        // PUT /api/{kind}/{id}
        // Patches one stored version in place without touching the
        // version history or the active flag.
        // POST /api/{kind}/upload-image
        // Stores a content image and returns its public URL.
        .route("/api/hero", post(handlers::content::create_hero))
        .route("/api/hero/{id}", put(handlers::content::update_hero))
        .route("/api/hero/upload-image", post(handlers::upload::upload_image))
        .route("/api/struktur", post(handlers::content::create_struktur))
        .route("/api/struktur/{id}", put(handlers::content::update_struktur))
        .route(
            "/api/struktur/upload-image",
            post(handlers::upload::upload_image),
        )
        .route(
            "/api/program-kerja",
            post(handlers::content::create_program_kerja),
        )
        .route(
            "/api/program-kerja/{id}",
            put(handlers::content::update_program_kerja),
        )
        .route(
            "/api/program-kerja/upload-image",
            post(handlers::upload::upload_image),
        )
        .route("/api/kegiatan", post(handlers::content::create_kegiatan))
        .route("/api/kegiatan/{id}", put(handlers::content::update_kegiatan))
        .route(
            "/api/kegiatan/upload-image",
            post(handlers::upload::upload_image),
        )
        .route("/api/ekskul", post(handlers::content::create_ekskul))
        .route("/api/ekskul/{id}", put(handlers::content::update_ekskul))
        .route(
            "/api/ekskul/upload-image",
            post(handlers::upload::upload_image),
        )
        // --- Singleton config sections ---
        // PUT /api/{kind}
        // Whitelist shallow-merge of a partial update into the singleton.
        .route("/api/navbar", put(handlers::settings::update_navbar))
        .route("/api/footer", put(handlers::settings::update_footer))
        .route("/api/informasi", put(handlers::settings::update_informasi))
        .route("/api/saran", put(handlers::settings::update_saran))
        // --- Account management (super_admin gated in handlers) ---
        // GET /api/auth/users
        // Full account listing for the Users screen.
        .route("/api/auth/users", get(handlers::auth::list_users))
        // POST /api/auth/register
        // Creates a new admin account.
        .route("/api/auth/register", post(handlers::auth::register_user))
        // PUT /api/auth/users/{id}/toggle-status
        // Deactivates or reactivates an account (never deletes).
        .route(
            "/api/auth/users/{id}/toggle-status",
            put(handlers::auth::toggle_user_status),
        )
}
