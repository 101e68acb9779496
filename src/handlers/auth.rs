use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{self, AuthUser},
    error::{ApiError, FieldError},
    models::{
        AdminUser, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterUserRequest, Role,
        UserProfile,
    },
};

/// login
///
/// [Public Route] Email + password authentication. Unknown email and
/// wrong password reject with the same message so the response does not
/// leak which accounts exist; deactivated accounts are told so. A
/// successful login stamps `last_login` and returns a signed bearer
/// token with the profile.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut errors = Vec::new();
    if payload.email.trim().is_empty() {
        errors.push(FieldError::required("email"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::required("password"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let invalid = || ApiError::Auth("Invalid credentials".to_string());

    let user = state
        .repo
        .find_user_by_email(payload.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }
    if !user.is_active {
        return Err(ApiError::Auth("Account is deactivated".to_string()));
    }

    state.repo.touch_last_login(user.id).await?;
    let token = auth::issue_token(user.id, &state.config)?;

    // Re-read so the returned profile carries the fresh last_login.
    let user = state.repo.get_user(user.id).await?.unwrap_or(user);

    tracing::info!(email = %user.email, "admin logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// get_me
///
/// [Authenticated Route] The requesting admin's own profile, re-fetched
/// so the admin panel always shows current role and status.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .repo
        .get_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::Auth("Token is not valid".to_string()))?;
    Ok(Json(json!({ "user": UserProfile::from(user) })))
}

/// change_password
///
/// [Authenticated Route] Rotates the requesting admin's own password.
/// The current password is re-verified even though the request already
/// carries a valid token.
#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.new_password.len() < 6 {
        return Err(ApiError::Validation(vec![FieldError::new(
            "newPassword",
            "Password must be at least 6 characters",
        )]));
    }

    let user = state
        .repo
        .get_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::Auth("Token is not valid".to_string()))?;

    if !auth::verify_password(&payload.current_password, &user.password_hash)? {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    let hash = auth::hash_password(&payload.new_password)?;
    state.repo.set_password_hash(user.id, &hash).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// list_users
///
/// [Super Admin Route] Full admin account listing for the Users screen.
#[utoipa::path(
    get,
    path = "/api/auth/users",
    responses(
        (status = 200, description = "All admin accounts", body = [UserProfile]),
        (status = 403, description = "Super admin role required")
    )
)]
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::SuperAdmin)?;
    let users: Vec<UserProfile> = state
        .repo
        .list_users()
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();
    Ok(Json(json!({ "users": users })))
}

/// register_user
///
/// [Super Admin Route] Creates a new admin account. Regular admins
/// cannot reach this; role elevation is a super_admin decision.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Validation errors or duplicate email"),
        (status = 403, description = "Super admin role required")
    )
)]
pub async fn register_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require(Role::SuperAdmin)?;

    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::required("name"));
    }
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if payload.password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "email",
            "Email already registered",
        )]));
    }

    let now = Utc::now();
    let user = AdminUser {
        id: Uuid::new_v4(),
        email,
        password_hash: auth::hash_password(&payload.password)?,
        name: payload.name.trim().to_string(),
        role: payload.role,
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };
    let user = state.repo.create_user(user).await?;

    tracing::info!(email = %user.email, role = user.role.as_str(), "admin account created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": UserProfile::from(user),
        })),
    ))
}

/// toggle_user_status
///
/// [Super Admin Route] Flips an account between active and deactivated.
/// Accounts are never deleted; a deactivated account keeps its audit
/// trail but can no longer authenticate. Self-deactivation is rejected so
/// the last super_admin cannot lock everyone out.
#[utoipa::path(
    put,
    path = "/api/auth/users/{id}/toggle-status",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Status toggled", body = UserProfile),
        (status = 400, description = "Attempted self-deactivation"),
        (status = 403, description = "Super admin role required"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn toggle_user_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::SuperAdmin)?;

    if id == auth.id {
        return Err(ApiError::BadRequest(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user = state
        .repo
        .set_user_active(id, !user.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(Json(json!({
        "message": message,
        "user": UserProfile::from(user),
    })))
}
