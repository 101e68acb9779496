use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. These serve the public site's read path: every content GET
/// resolves the single active version of its section, and the config
/// GETs always return live state seeded from defaults.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /api/health
        // Liveness endpoint for monitoring and load balancer checks.
        .route("/api/health", get(handlers::health))
        // POST /api/auth/login
        // Email + password authentication producing a bearer token.
        .route("/api/auth/login", post(handlers::auth::login))
        // --- Versioned content sections (active-version reads) ---
        .route("/api/hero", get(handlers::content::get_hero))
        .route("/api/struktur", get(handlers::content::get_struktur))
        .route("/api/program-kerja", get(handlers::content::get_program_kerja))
        .route("/api/kegiatan", get(handlers::content::get_kegiatan))
        .route("/api/ekskul", get(handlers::content::get_ekskul))
        // --- Singleton config sections (always present) ---
        .route("/api/navbar", get(handlers::settings::get_navbar))
        .route("/api/footer", get(handlers::settings::get_footer))
        .route("/api/informasi", get(handlers::settings::get_informasi))
        .route("/api/saran", get(handlers::settings::get_saran))
}
