use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    content::{self, ContentKind},
    error::ApiError,
    models::Role,
};

// --- Shared Per-Kind Logic ---
//
// All five versioned sections share one read/write path; the per-kind
// handlers below only pin down the route, the kind, and the OpenAPI
// metadata.

/// Active-version resolution for the public read path. A missing active
/// document is a 404; the frontend renders its "data not yet available"
/// state instead of an error page.
async fn get_section(state: &AppState, kind: ContentKind) -> Result<Json<Value>, ApiError> {
    let record = state
        .repo
        .get_active(kind)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} data not found", kind.display_name())))?;
    Ok(Json(json!({ (kind.response_key()): record })))
}

/// Create = new version: validates the document, retires every existing
/// version of the kind and inserts the new active one.
async fn create_section(
    state: &AppState,
    kind: ContentKind,
    editor: Uuid,
    payload: Value,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let errors = content::validate(kind, &payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let record = state.repo.insert_version(kind, payload, editor).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("{} created successfully", kind.display_name()),
            (kind.response_key()): record,
        })),
    ))
}

/// Update = patch by id: rewrites the document fields of an existing
/// version in place. Does not touch `is_active` and does not add to the
/// version history.
async fn patch_section(
    state: &AppState,
    kind: ContentKind,
    id: Uuid,
    editor: Uuid,
    payload: Value,
) -> Result<Json<Value>, ApiError> {
    let errors = content::validate(kind, &payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let record = state
        .repo
        .patch_version(kind, id, payload, editor)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", kind.display_name())))?;
    Ok(Json(json!({
        "message": format!("{} updated successfully", kind.display_name()),
        (kind.response_key()): record,
    })))
}

// --- Hero Section ---

/// [Public Route] Current hero section content.
#[utoipa::path(
    get,
    path = "/api/hero",
    responses(
        (status = 200, description = "Active hero section"),
        (status = 404, description = "No hero section published yet")
    )
)]
pub async fn get_hero(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    get_section(&state, ContentKind::Hero).await
}

/// [Admin Route] Publish a new hero section version.
#[utoipa::path(
    post,
    path = "/api/hero",
    responses(
        (status = 201, description = "Hero section created"),
        (status = 400, description = "Validation errors"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_hero(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require(Role::Admin)?;
    create_section(&state, ContentKind::Hero, auth.id, payload).await
}

/// [Admin Route] Patch an existing hero section version by id.
#[utoipa::path(
    put,
    path = "/api/hero/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Hero section updated"),
        (status = 404, description = "Version not found")
    )
)]
pub async fn update_hero(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Admin)?;
    patch_section(&state, ContentKind::Hero, id, auth.id, payload).await
}

// --- Struktur (Organization Structure) ---

/// [Public Route] Current organization structure content.
#[utoipa::path(
    get,
    path = "/api/struktur",
    responses(
        (status = 200, description = "Active struktur section"),
        (status = 404, description = "No struktur published yet")
    )
)]
pub async fn get_struktur(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    get_section(&state, ContentKind::Struktur).await
}

/// [Admin Route] Publish a new struktur version.
#[utoipa::path(
    post,
    path = "/api/struktur",
    responses(
        (status = 201, description = "Struktur created"),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_struktur(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require(Role::Admin)?;
    create_section(&state, ContentKind::Struktur, auth.id, payload).await
}

/// [Admin Route] Patch an existing struktur version by id.
#[utoipa::path(
    put,
    path = "/api/struktur/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Struktur updated"),
        (status = 404, description = "Version not found")
    )
)]
pub async fn update_struktur(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Admin)?;
    patch_section(&state, ContentKind::Struktur, id, auth.id, payload).await
}

// --- Program Kerja (Work Programs) ---

/// [Public Route] Current program kerja content.
#[utoipa::path(
    get,
    path = "/api/program-kerja",
    responses(
        (status = 200, description = "Active program kerja section"),
        (status = 404, description = "No program kerja published yet")
    )
)]
pub async fn get_program_kerja(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    get_section(&state, ContentKind::ProgramKerja).await
}

/// [Admin Route] Publish a new program kerja version.
#[utoipa::path(
    post,
    path = "/api/program-kerja",
    responses(
        (status = 201, description = "Program kerja created"),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_program_kerja(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require(Role::Admin)?;
    create_section(&state, ContentKind::ProgramKerja, auth.id, payload).await
}

/// [Admin Route] Patch an existing program kerja version by id.
#[utoipa::path(
    put,
    path = "/api/program-kerja/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Program kerja updated"),
        (status = 404, description = "Version not found")
    )
)]
pub async fn update_program_kerja(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Admin)?;
    patch_section(&state, ContentKind::ProgramKerja, id, auth.id, payload).await
}

// --- Kegiatan (Annual Activities / PHBI) ---

/// [Public Route] Current kegiatan content.
#[utoipa::path(
    get,
    path = "/api/kegiatan",
    responses(
        (status = 200, description = "Active kegiatan section"),
        (status = 404, description = "No kegiatan published yet")
    )
)]
pub async fn get_kegiatan(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    get_section(&state, ContentKind::Kegiatan).await
}

/// [Admin Route] Publish a new kegiatan version.
#[utoipa::path(
    post,
    path = "/api/kegiatan",
    responses(
        (status = 201, description = "Kegiatan created"),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_kegiatan(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require(Role::Admin)?;
    create_section(&state, ContentKind::Kegiatan, auth.id, payload).await
}

/// [Admin Route] Patch an existing kegiatan version by id.
#[utoipa::path(
    put,
    path = "/api/kegiatan/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Kegiatan updated"),
        (status = 404, description = "Version not found")
    )
)]
pub async fn update_kegiatan(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Admin)?;
    patch_section(&state, ContentKind::Kegiatan, id, auth.id, payload).await
}

// --- Ekskul (Extracurriculars) ---

/// [Public Route] Current ekskul content.
#[utoipa::path(
    get,
    path = "/api/ekskul",
    responses(
        (status = 200, description = "Active ekskul section"),
        (status = 404, description = "No ekskul published yet")
    )
)]
pub async fn get_ekskul(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    get_section(&state, ContentKind::Ekskul).await
}

/// [Admin Route] Publish a new ekskul version.
#[utoipa::path(
    post,
    path = "/api/ekskul",
    responses(
        (status = 201, description = "Ekskul created"),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_ekskul(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require(Role::Admin)?;
    create_section(&state, ContentKind::Ekskul, auth.id, payload).await
}

/// [Admin Route] Patch an existing ekskul version by id.
#[utoipa::path(
    put,
    path = "/api/ekskul/{id}",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Ekskul updated"),
        (status = 404, description = "Version not found")
    )
)]
pub async fn update_ekskul(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Admin)?;
    patch_section(&state, ContentKind::Ekskul, id, auth.id, payload).await
}
