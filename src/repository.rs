use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, types::Json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::content::ContentKind;
use crate::error::ApiError;
use crate::models::{AdminUser, ContentRecord, EditorRef, Role};

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations: the
/// versioned content store, admin accounts, and the persisted side of the
/// singleton config sections. Handlers interact with the data layer
/// through this trait only, so the Postgres implementation can be swapped
/// for the in-memory one in tests.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Versioned Content Store ---

    /// Active-version resolution for the public read path. When the
    /// single-active invariant is transiently violated (see
    /// `insert_version`), picks exactly one deterministic winner (the
    /// most recently created active row) and never errors over it.
    async fn get_active(&self, kind: ContentKind) -> Result<Option<ContentRecord>, ApiError>;

    /// Appends a new version: deactivates ALL existing rows of the kind,
    /// then inserts a fresh row with `is_active = true`. These are two
    /// separate writes, not one transaction; a reader between them sees
    /// no active row (handled as 404 → fallback UI) and two concurrent
    /// writers can both land active rows until the next write settles it.
    /// Matches the source system's behavior; see DESIGN.md before adding
    /// locking here.
    async fn insert_version(
        &self,
        kind: ContentKind,
        data: Value,
        editor: Uuid,
    ) -> Result<ContentRecord, ApiError>;

    /// Patches an existing version by id in place. Does not touch
    /// `is_active` and does not create a row; `None` when the id is
    /// unknown.
    async fn patch_version(
        &self,
        kind: ContentKind,
        id: Uuid,
        data: Value,
        editor: Uuid,
    ) -> Result<Option<ContentRecord>, ApiError>;

    /// Total number of stored versions of a kind, retired ones included.
    async fn count_versions(&self, kind: ContentKind) -> Result<i64, ApiError>;

    // --- Admin Accounts ---
    async fn get_user(&self, id: Uuid) -> Result<Option<AdminUser>, ApiError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, ApiError>;
    async fn list_users(&self) -> Result<Vec<AdminUser>, ApiError>;
    async fn create_user(&self, user: AdminUser) -> Result<AdminUser, ApiError>;
    /// Toggle target: accounts are deactivated, never deleted.
    async fn set_user_active(&self, id: Uuid, active: bool)
    -> Result<Option<AdminUser>, ApiError>;
    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), ApiError>;
    async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError>;

    // --- Singleton Config Persistence ---
    async fn load_setting(&self, key: &str) -> Result<Option<Value>, ApiError>;
    async fn save_setting(&self, key: &str, value: &Value) -> Result<(), ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

// Row tuples fetched through the runtime query API.
type ContentRow = (
    Uuid,
    Json<Value>,
    bool,
    Option<Uuid>,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<String>,
    Option<String>,
);

type UserRow = (
    Uuid,
    String,
    String,
    String,
    String,
    bool,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn map_content_row(row: ContentRow) -> ContentRecord {
    let (id, data, is_active, updated_by, created_at, updated_at, name, email) = row;
    // The editor reference is weak: when the account is gone the join
    // yields nulls and the record simply carries no editor.
    let updated_by = match (updated_by, name, email) {
        (Some(id), Some(name), Some(email)) => Some(EditorRef { id, name, email }),
        _ => None,
    };
    ContentRecord {
        id,
        data: data.0,
        is_active,
        updated_by,
        created_at,
        updated_at,
    }
}

fn map_user_row(row: UserRow) -> AdminUser {
    let (id, email, password_hash, name, role, is_active, last_login, created_at, updated_at) = row;
    AdminUser {
        id,
        email,
        password_hash,
        name,
        // Least-privilege fallback for rows written by older builds.
        role: Role::parse(&role).unwrap_or(Role::Admin),
        is_active,
        last_login,
        created_at,
        updated_at,
    }
}

/// PostgresRepository
///
/// The concrete implementation backed by PostgreSQL. Content documents
/// live one table per kind as JSONB rows; table names come from
/// [`ContentKind::table`], never from client input.
pub struct PostgresRepository {
    pool: PgPool,
}

const USER_COLUMNS: &str =
    "id, email, password_hash, name, role, is_active, last_login, created_at, updated_at";

impl PostgresRepository {
    /// Creates a new repository instance using the initialized pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the schema on startup when absent. Deliberately no unique
    /// partial index on `(is_active)`: the single-active invariant is a
    /// soft one resolved at read time (see DESIGN.md).
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        for kind in ContentKind::ALL {
            let ddl = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id UUID PRIMARY KEY,
                    data JSONB NOT NULL,
                    is_active BOOLEAN NOT NULL DEFAULT true,
                    updated_by UUID,
                    created_at TIMESTAMPTZ NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL
                )
                "#,
                kind.table()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT true,
                last_login TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS site_settings (
                key TEXT PRIMARY KEY,
                data JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_by_id(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> Result<Option<ContentRecord>, ApiError> {
        let sql = format!(
            r#"
            SELECT c.id, c.data, c.is_active, c.updated_by, c.created_at, c.updated_at,
                   u.name, u.email
            FROM {} c
            LEFT JOIN admin_users u ON c.updated_by = u.id
            WHERE c.id = $1
            "#,
            kind.table()
        );
        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_content_row))
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_active(&self, kind: ContentKind) -> Result<Option<ContentRecord>, ApiError> {
        // ORDER BY created_at DESC settles on one winner if a concurrent
        // create left more than one active row behind.
        let sql = format!(
            r#"
            SELECT c.id, c.data, c.is_active, c.updated_by, c.created_at, c.updated_at,
                   u.name, u.email
            FROM {} c
            LEFT JOIN admin_users u ON c.updated_by = u.id
            WHERE c.is_active = true
            ORDER BY c.created_at DESC
            LIMIT 1
            "#,
            kind.table()
        );
        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_content_row))
    }

    async fn insert_version(
        &self,
        kind: ContentKind,
        data: Value,
        editor: Uuid,
    ) -> Result<ContentRecord, ApiError> {
        // Write 1: retire every existing version of this kind.
        let deactivate = format!("UPDATE {} SET is_active = false WHERE is_active = true", kind.table());
        sqlx::query(&deactivate).execute(&self.pool).await?;

        // Write 2: insert the new active version. The window between the
        // two writes is observable; see the trait documentation.
        let now = Utc::now();
        let id = Uuid::new_v4();
        let insert = format!(
            r#"
            INSERT INTO {} (id, data, is_active, updated_by, created_at, updated_at)
            VALUES ($1, $2, true, $3, $4, $4)
            "#,
            kind.table()
        );
        sqlx::query(&insert)
            .bind(id)
            .bind(Json(&data))
            .bind(editor)
            .bind(now)
            .execute(&self.pool)
            .await?;

        self.fetch_by_id(kind, id)
            .await?
            .ok_or_else(|| ApiError::Upstream("inserted version not found".to_string()))
    }

    async fn patch_version(
        &self,
        kind: ContentKind,
        id: Uuid,
        data: Value,
        editor: Uuid,
    ) -> Result<Option<ContentRecord>, ApiError> {
        let sql = format!(
            "UPDATE {} SET data = $2, updated_by = $3, updated_at = $4 WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(&data))
            .bind(editor)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_by_id(kind, id).await
    }

    async fn count_versions(&self, kind: ContentKind) -> Result<i64, ApiError> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<AdminUser>, ApiError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM admin_users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_user_row))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, ApiError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM admin_users WHERE LOWER(email) = LOWER($1)");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_user_row))
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM admin_users ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_user_row).collect())
    }

    async fn create_user(&self, user: AdminUser) -> Result<AdminUser, ApiError> {
        sqlx::query(
            r#"
            INSERT INTO admin_users
                (id, email, password_hash, name, role, is_active, last_login, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.last_login)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_user_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<AdminUser>, ApiError> {
        let result = sqlx::query(
            "UPDATE admin_users SET is_active = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE admin_users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("UPDATE admin_users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load_setting(&self, key: &str) -> Result<Option<Value>, ApiError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM site_settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(data,)| data.0))
    }

    async fn save_setting(&self, key: &str, value: &Value) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO site_settings (key, data, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key)
        .bind(Json(value))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// --- In-Memory Implementation (For Tests) ---

#[derive(Debug, Clone)]
struct StoredDoc {
    id: Uuid,
    data: Value,
    is_active: bool,
    updated_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    content: HashMap<&'static str, Vec<StoredDoc>>,
    users: Vec<AdminUser>,
    settings: HashMap<String, Value>,
}

/// MemoryRepository
///
/// An in-memory implementation of [`Repository`] used by unit and
/// integration tests, mirroring the deactivate-then-insert convention of
/// the Postgres implementation so the versioning contract can be
/// exercised without a database.
#[derive(Default)]
pub struct MemoryRepository {
    state: tokio::sync::Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn enrich(doc: &StoredDoc, users: &[AdminUser]) -> ContentRecord {
    let updated_by = doc.updated_by.and_then(|editor| {
        users.iter().find(|u| u.id == editor).map(|u| EditorRef {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        })
    });
    ContentRecord {
        id: doc.id,
        data: doc.data.clone(),
        is_active: doc.is_active,
        updated_by,
        created_at: doc.created_at,
        updated_at: doc.updated_at,
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_active(&self, kind: ContentKind) -> Result<Option<ContentRecord>, ApiError> {
        let state = self.state.lock().await;
        let docs = state.content.get(kind.table());
        // Newest active wins, matching the Postgres ORDER BY.
        let doc = docs.and_then(|docs| docs.iter().rev().find(|d| d.is_active));
        Ok(doc.map(|d| enrich(d, &state.users)))
    }

    async fn insert_version(
        &self,
        kind: ContentKind,
        data: Value,
        editor: Uuid,
    ) -> Result<ContentRecord, ApiError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let doc = StoredDoc {
            id: Uuid::new_v4(),
            data,
            is_active: true,
            updated_by: Some(editor),
            created_at: now,
            updated_at: now,
        };

        let docs = state.content.entry(kind.table()).or_default();
        for existing in docs.iter_mut() {
            existing.is_active = false;
        }
        docs.push(doc.clone());

        Ok(enrich(&doc, &state.users))
    }

    async fn patch_version(
        &self,
        kind: ContentKind,
        id: Uuid,
        data: Value,
        editor: Uuid,
    ) -> Result<Option<ContentRecord>, ApiError> {
        let mut state = self.state.lock().await;
        let Some(docs) = state.content.get_mut(kind.table()) else {
            return Ok(None);
        };
        let Some(doc) = docs.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        doc.data = data;
        doc.updated_by = Some(editor);
        doc.updated_at = Utc::now();
        let doc = doc.clone();
        Ok(Some(enrich(&doc, &state.users)))
    }

    async fn count_versions(&self, kind: ContentKind) -> Result<i64, ApiError> {
        let state = self.state.lock().await;
        Ok(state
            .content
            .get(kind.table())
            .map(|docs| docs.len() as i64)
            .unwrap_or(0))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<AdminUser>, ApiError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, ApiError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        let state = self.state.lock().await;
        let mut users = state.users.clone();
        users.reverse();
        Ok(users)
    }

    async fn create_user(&self, user: AdminUser) -> Result<AdminUser, ApiError> {
        let mut state = self.state.lock().await;
        // Mirror the unique index on email.
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(ApiError::Upstream(format!(
                "duplicate email: {}",
                user.email
            )));
        }
        state.users.push(user.clone());
        Ok(user)
    }

    async fn set_user_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<AdminUser>, ApiError> {
        let mut state = self.state.lock().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.is_active = active;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.password_hash = hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn load_setting(&self, key: &str) -> Result<Option<Value>, ApiError> {
        let state = self.state.lock().await;
        Ok(state.settings.get(key).cloned())
    }

    async fn save_setting(&self, key: &str, value: &Value) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        state.settings.insert(key.to_string(), value.clone());
        Ok(())
    }
}
