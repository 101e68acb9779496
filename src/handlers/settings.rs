use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{
        FooterConfig, FooterUpdate, InformasiConfig, InformasiUpdate, NavbarConfig, NavbarUpdate,
        Role, SaranConfig, SaranUpdate,
    },
    settings::ConfigSection,
};

// --- Shared Per-Section Logic ---
//
// Config sections are singletons: GET returns the live state (always
// present, seeded from defaults), PUT whitelist-merges a partial update.

async fn get_config<C: ConfigSection>(state: &AppState) -> Json<Value> {
    let config: C = state.settings.get().await;
    Json(json!({ (C::KEY): config }))
}

async fn put_config<C: ConfigSection>(
    auth: &AuthUser,
    state: &AppState,
    patch: C::Patch,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Admin)?;
    let config = state.settings.update::<C>(patch).await?;
    Ok(Json(json!({
        "message": format!("{} updated successfully", C::DISPLAY_NAME),
        (C::KEY): config,
    })))
}

// --- Navbar ---

/// [Public Route] Navigation labels and social links.
#[utoipa::path(
    get,
    path = "/api/navbar",
    responses((status = 200, description = "Current navbar config", body = NavbarConfig))
)]
pub async fn get_navbar(State(state): State<AppState>) -> Json<Value> {
    get_config::<NavbarConfig>(&state).await
}

/// [Admin Route] Partial update of the navbar config.
#[utoipa::path(
    put,
    path = "/api/navbar",
    request_body = NavbarUpdate,
    responses(
        (status = 200, description = "Navbar updated", body = NavbarConfig),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn update_navbar(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<NavbarUpdate>,
) -> Result<Json<Value>, ApiError> {
    put_config::<NavbarConfig>(&auth, &state, patch).await
}

// --- Footer ---

/// [Public Route] Footer description and address block.
#[utoipa::path(
    get,
    path = "/api/footer",
    responses((status = 200, description = "Current footer config", body = FooterConfig))
)]
pub async fn get_footer(State(state): State<AppState>) -> Json<Value> {
    get_config::<FooterConfig>(&state).await
}

/// [Admin Route] Partial update of the footer config.
#[utoipa::path(
    put,
    path = "/api/footer",
    request_body = FooterUpdate,
    responses(
        (status = 200, description = "Footer updated", body = FooterConfig),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn update_footer(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<FooterUpdate>,
) -> Result<Json<Value>, ApiError> {
    put_config::<FooterConfig>(&auth, &state, patch).await
}

// --- Informasi ---

/// [Public Route] Announcement block and results dashboard link.
#[utoipa::path(
    get,
    path = "/api/informasi",
    responses((status = 200, description = "Current informasi config", body = InformasiConfig))
)]
pub async fn get_informasi(State(state): State<AppState>) -> Json<Value> {
    get_config::<InformasiConfig>(&state).await
}

/// [Admin Route] Partial update of the informasi config.
#[utoipa::path(
    put,
    path = "/api/informasi",
    request_body = InformasiUpdate,
    responses(
        (status = 200, description = "Informasi updated", body = InformasiConfig),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn update_informasi(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<InformasiUpdate>,
) -> Result<Json<Value>, ApiError> {
    put_config::<InformasiConfig>(&auth, &state, patch).await
}

// --- Saran (Suggestion Box) ---

/// [Public Route] Suggestion-box block and external form link.
#[utoipa::path(
    get,
    path = "/api/saran",
    responses((status = 200, description = "Current saran config", body = SaranConfig))
)]
pub async fn get_saran(State(state): State<AppState>) -> Json<Value> {
    get_config::<SaranConfig>(&state).await
}

/// [Admin Route] Partial update of the saran config.
#[utoipa::path(
    put,
    path = "/api/saran",
    request_body = SaranUpdate,
    responses(
        (status = 200, description = "Saran updated", body = SaranConfig),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn update_saran(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<SaranUpdate>,
) -> Result<Json<Value>, ApiError> {
    put_config::<SaranConfig>(&auth, &state, patch).await
}
