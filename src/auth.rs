use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    models::{AdminUser, Role},
    repository::RepositoryState,
};

/// Claims
///
/// Payload structure of the admin session tokens. Signed with the
/// server's secret, validated on every authenticated request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the admin user. The user record is
    /// re-fetched on every request, so a token alone never grants access
    /// to a deactivated account.
    pub sub: Uuid,
    /// Expiration time (exp): timestamp after which the token must not
    /// be accepted.
    pub exp: usize,
    /// Issued at (iat).
    pub iat: usize,
}

/// issue_token
///
/// Signs a session token for the given user id, expiring after the
/// configured number of hours.
pub fn issue_token(user_id: Uuid, config: &AppConfig) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + config.jwt_expiry_hours * 3600) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Upstream(format!("failed to sign token: {e}")))
}

/// hash_password
///
/// Hashes a password with Argon2id, returning the PHC-formatted string
/// that embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Upstream(format!("failed to hash password: {e}")))
}

/// verify_password
///
/// Verifies a password against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Upstream(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// AuthUser
///
/// The resolved identity of an authenticated request: the output of the
/// extractor below. Handlers destructure this for the editor id and run
/// role checks through [`AuthUser::require`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl AuthUser {
    /// Role gate: passes when this user's role satisfies the required
    /// one, otherwise rejects with 403.
    pub fn require(&self, required: Role) -> Result<&Self, ApiError> {
        if self.role.satisfies(required) {
            Ok(self)
        } else {
            let message = match required {
                Role::Admin => "Access denied. Admin role required.",
                Role::SuperAdmin => "Access denied. Super admin role required.",
            };
            Err(ApiError::Forbidden(message.to_string()))
        }
    }
}

fn resolved(user: AdminUser) -> Result<AuthUser, ApiError> {
    if !user.is_active {
        return Err(ApiError::Auth("Account is deactivated".to_string()));
    }
    Ok(AuthUser {
        id: user.id,
        role: user.role,
        name: user.name,
        email: user.email,
    })
}

/// AuthUser Extractor Implementation
///
/// Makes `AuthUser` usable as a handler argument on any protected route.
/// The flow:
/// 1. Dependency resolution: Repository and AppConfig from the app state.
/// 2. Local bypass: in `Env::Local`, an `x-user-id` header naming an
///    existing account authenticates directly (development convenience,
///    never active in production).
/// 3. Bearer token extraction and JWT decoding.
/// 4. Database re-fetch: the account must still exist and be active.
///
/// Rejection is an [`ApiError::Auth`] → 401 with a `{message}` body.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // Local development bypass, guarded by the Env check. The id must
        // still map to a real account so roles load correctly.
        if config.env == Env::Local {
            if let Some(user_id_header) = parts.headers.get("x-user-id") {
                if let Ok(id_str) = user_id_header.to_str() {
                    if let Ok(user_id) = Uuid::parse_str(id_str) {
                        if let Some(user) = repo.get_user(user_id).await? {
                            return resolved(user);
                        }
                    }
                }
            }
        }
        // In production, or when the bypass does not resolve, fall through
        // to the standard token flow.

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Auth("No token, authorization denied".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Auth("No token, authorization denied".to_string()))?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                // Expired tokens are routine; anything else is suspicious
                // enough to log. Clients get the same message either way.
                if !matches!(e.kind(), ErrorKind::ExpiredSignature) {
                    tracing::debug!("token rejected: {e}");
                }
                return Err(ApiError::Auth("Token is not valid".to_string()));
            }
        };

        // Final verification against the database: a token issued before
        // an account was deactivated must stop working immediately.
        let user = repo
            .get_user(token_data.claims.sub)
            .await?
            .ok_or_else(|| ApiError::Auth("Token is not valid".to_string()))?;

        resolved(user)
    }
}

/// ensure_default_admin
///
/// Startup bootstrap: creates the configured super_admin account when no
/// account with that email exists yet, so a fresh deployment is reachable
/// without manual database access.
pub async fn ensure_default_admin(
    repo: &RepositoryState,
    config: &AppConfig,
) -> Result<(), ApiError> {
    if repo
        .find_user_by_email(&config.default_admin_email)
        .await?
        .is_some()
    {
        tracing::debug!("default admin already exists");
        return Ok(());
    }

    let now = Utc::now();
    let admin = AdminUser {
        id: Uuid::new_v4(),
        email: config.default_admin_email.clone(),
        password_hash: hash_password(&config.default_admin_password)?,
        name: "Super Administrator".to_string(),
        role: Role::SuperAdmin,
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };

    repo.create_user(admin).await?;
    tracing::info!(email = %config.default_admin_email, "default admin created");
    Ok(())
}
