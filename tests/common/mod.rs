use chrono::Utc;
use ketaqwaan_portal::{
    AppConfig, AppState, MemoryRepository, MockStorageService, SettingsStore, create_router,
    auth::hash_password,
    models::{AdminUser, Role},
    repository::RepositoryState,
    storage::StorageState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

/// A running application instance bound to an ephemeral port, backed by
/// the in-memory repository and the mock storage service so tests need
/// neither Postgres nor MinIO.
pub struct TestApp {
    pub address: String,
    pub repo: RepositoryState,
}

pub async fn spawn_app() -> TestApp {
    let repo: RepositoryState = Arc::new(MemoryRepository::new());
    let storage: StorageState = Arc::new(MockStorageService::new());
    let settings = Arc::new(
        SettingsStore::init(repo.clone())
            .await
            .expect("Failed to seed settings"),
    );
    let config = AppConfig::default();

    let state = AppState {
        repo: repo.clone(),
        storage,
        settings,
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

/// Seeds an active admin account directly through the repository, the
/// way the startup bootstrap would.
#[allow(dead_code)]
pub async fn seed_admin(app: &TestApp, email: &str, password: &str, role: Role) -> AdminUser {
    let now = Utc::now();
    let user = AdminUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: hash_password(password).unwrap(),
        name: "Test Admin".to_string(),
        role,
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };
    app.repo.create_user(user).await.expect("seed user failed")
}

/// Logs in through the real endpoint and returns the bearer token.
#[allow(dead_code)]
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 200, "login should succeed");
    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().expect("token missing").to_string()
}
