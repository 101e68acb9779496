use axum::{
    Json, Router,
    extract::{FromRef, Request},
    http::{HeaderName, StatusCode},
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod settings;
pub mod storage;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser; // The resolved authenticated admin identity.
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry
// point and the integration tests.
pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use settings::{SettingsState, SettingsStore};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the
/// application from the `#[utoipa::path]` and `ToSchema` annotations.
/// Served at `/api-docs/openapi.json`, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::content::get_hero, handlers::content::create_hero,
        handlers::content::update_hero,
        handlers::content::get_struktur, handlers::content::create_struktur,
        handlers::content::update_struktur,
        handlers::content::get_program_kerja, handlers::content::create_program_kerja,
        handlers::content::update_program_kerja,
        handlers::content::get_kegiatan, handlers::content::create_kegiatan,
        handlers::content::update_kegiatan,
        handlers::content::get_ekskul, handlers::content::create_ekskul,
        handlers::content::update_ekskul,
        handlers::settings::get_navbar, handlers::settings::update_navbar,
        handlers::settings::get_footer, handlers::settings::update_footer,
        handlers::settings::get_informasi, handlers::settings::update_informasi,
        handlers::settings::get_saran, handlers::settings::update_saran,
        handlers::auth::login, handlers::auth::get_me, handlers::auth::change_password,
        handlers::auth::list_users, handlers::auth::register_user,
        handlers::auth::toggle_user_status,
        handlers::upload::upload_image,
    ),
    components(
        schemas(
            models::Role, models::UserProfile, models::ContentRecord, models::EditorRef,
            models::NavbarConfig, models::NavbarUpdate,
            models::FooterConfig, models::FooterUpdate,
            models::InformasiConfig, models::InformasiUpdate,
            models::SaranConfig, models::SaranUpdate,
            models::LoginRequest, models::LoginResponse,
            models::ChangePasswordRequest, models::RegisterUserRequest,
            models::UploadResponse, models::HealthResponse,
            error::FieldError,
        )
    ),
    tags(
        (name = "ketaqwaan", description = "Ketaqwaan content management API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: versioned content, admin accounts, persisted
    /// config rows.
    pub repo: RepositoryState,
    /// Storage layer: object storage for content images.
    pub storage: StorageState,
    /// Singleton config store: live navbar/footer/informasi/saran state.
    pub settings: SettingsState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These allow handlers and extractors to selectively pull components
// from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(app_state: &AppState) -> SettingsState {
        app_state.settings.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the protected route groups. `AuthUser`
/// implements `FromRequestParts`, so if authentication (JWT validation,
/// account re-fetch, active check) fails, the request is rejected with
/// 401 before any handler runs. Role checks happen afterwards inside the
/// handlers.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// route_not_found
///
/// Fallback for unknown paths, keeping the error shape uniform with the
/// rest of the API.
async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": "Route not found" })),
    )
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global
/// and scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Session routes: protected by the auth middleware.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Mutation routes: same authentication layer; the role gates run
        // inside the handlers after the request passes it.
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .fallback(route_not_found)
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response
                // lifecycle in a span carrying the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the tracing span creation for `TraceLayer`: extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line
/// for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
