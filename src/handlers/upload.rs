use axum::{
    Json,
    extract::{Multipart, State},
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{Role, UploadResponse},
};

/// upload_image
///
/// [Admin Route] Receives a multipart form with an `image` field and
/// stores it in object storage under a unique key. The returned URL is
/// what the admin panel embeds into content documents (slides, logos),
/// so the body must be read fully before the store call.
///
/// Shared by every content section: `POST /api/{kind}/upload-image` all
/// route here.
#[utoipa::path(
    post,
    path = "/api/hero/upload-image",
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "No image file provided"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn upload_image(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    auth.require(Role::Admin)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        // Unique object key: 'uploads/UUID.ext'.
        let extension = std::path::Path::new(&filename)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("bin");
        let object_key = format!("uploads/{}.{}", Uuid::new_v4(), extension);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
            .to_vec();

        let image_url = state
            .storage
            .upload_image(&object_key, bytes, &content_type)
            .await
            .map_err(ApiError::Upstream)?;

        return Ok(Json(UploadResponse {
            message: "Image uploaded successfully".to_string(),
            image_url,
            public_id: object_key,
        }));
    }

    Err(ApiError::BadRequest("No image file provided".to_string()))
}
