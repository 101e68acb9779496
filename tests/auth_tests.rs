use ketaqwaan_portal::models::Role;

mod common;
use common::{login, seed_admin, spawn_app};

#[tokio::test]
async fn login_returns_token_and_profile() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "admin@ketaqwaan.com", "admin123", Role::SuperAdmin).await;

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": "admin@ketaqwaan.com", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "admin@ketaqwaan.com");
    assert_eq!(body["user"]["role"], "super_admin");
    // Login stamps last_login.
    assert!(body["user"]["lastLogin"].is_string());
    // Credentials never serialize.
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "admin@ketaqwaan.com", "admin123", Role::Admin).await;

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": "admin@ketaqwaan.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_email_is_401_with_same_message() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": "ghost@ketaqwaan.com", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn bearer_token_authenticates_me_endpoint() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "admin@ketaqwaan.com", "admin123", Role::Admin).await;
    let token = login(&app, "admin@ketaqwaan.com", "admin123").await;

    let response = client
        .get(format!("{}/api/auth/me", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "admin@ketaqwaan.com");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/auth/me", app.address))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn change_password_requires_correct_current_password() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "admin@ketaqwaan.com", "admin123", Role::Admin).await;
    let token = login(&app, "admin@ketaqwaan.com", "admin123").await;

    let response = client
        .put(format!("{}/api/auth/change-password", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "currentPassword": "wrong",
            "newPassword": "brand-new-pass"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Current password is incorrect");
}

#[tokio::test]
async fn change_password_rotates_credentials() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "admin@ketaqwaan.com", "admin123", Role::Admin).await;
    let token = login(&app, "admin@ketaqwaan.com", "admin123").await;

    let response = client
        .put(format!("{}/api/auth/change-password", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "currentPassword": "admin123",
            "newPassword": "brand-new-pass"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The old password no longer authenticates, the new one does.
    let old = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": "admin@ketaqwaan.com", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(old.status(), 401);

    login(&app, "admin@ketaqwaan.com", "brand-new-pass").await;
}

#[tokio::test]
async fn admin_cannot_reach_super_admin_endpoints() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "admin@ketaqwaan.com", "admin123", Role::Admin).await;
    let token = login(&app, "admin@ketaqwaan.com", "admin123").await;

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "name": "New Admin",
            "email": "new@ketaqwaan.com",
            "password": "secret123",
            "role": "admin"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Access denied. Super admin role required.");

    // The account list is unchanged.
    assert_eq!(app.repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn super_admin_registers_and_lists_users() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "root@ketaqwaan.com", "admin123", Role::SuperAdmin).await;
    let token = login(&app, "root@ketaqwaan.com", "admin123").await;

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "name": "New Admin",
            "email": "new@ketaqwaan.com",
            "password": "secret123",
            "role": "admin"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["role"], "admin");

    // The new account can log in right away.
    login(&app, "new@ketaqwaan.com", "secret123").await;

    let response = client
        .get(format!("{}/api/auth/users", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "root@ketaqwaan.com", "admin123", Role::SuperAdmin).await;
    let token = login(&app, "root@ketaqwaan.com", "admin123").await;

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "name": "Clone",
            "email": "ROOT@ketaqwaan.com",
            "password": "secret123",
            "role": "admin"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn toggle_status_locks_out_deactivated_account() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "root@ketaqwaan.com", "admin123", Role::SuperAdmin).await;
    let target = seed_admin(&app, "victim@ketaqwaan.com", "admin123", Role::Admin).await;
    let root_token = login(&app, "root@ketaqwaan.com", "admin123").await;
    let target_token = login(&app, "victim@ketaqwaan.com", "admin123").await;

    let response = client
        .put(format!(
            "{}/api/auth/users/{}/toggle-status",
            app.address, target.id
        ))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User deactivated successfully");
    assert_eq!(body["user"]["isActive"], false);

    // The previously issued token dies with the account: tokens are
    // re-validated against the database on every request.
    let response = client
        .get(format!("{}/api/auth/me", app.address))
        .bearer_auth(&target_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Account is deactivated");

    // Login is rejected too.
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": "victim@ketaqwaan.com", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Toggling again reactivates.
    let response = client
        .put(format!(
            "{}/api/auth/users/{}/toggle-status",
            app.address, target.id
        ))
        .bearer_auth(&root_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User activated successfully");
    login(&app, "victim@ketaqwaan.com", "admin123").await;
}

#[tokio::test]
async fn self_deactivation_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let root = seed_admin(&app, "root@ketaqwaan.com", "admin123", Role::SuperAdmin).await;
    let token = login(&app, "root@ketaqwaan.com", "admin123").await;

    let response = client
        .put(format!(
            "{}/api/auth/users/{}/toggle-status",
            app.address, root.id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You cannot deactivate your own account");
}

#[tokio::test]
async fn toggle_unknown_account_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app, "root@ketaqwaan.com", "admin123", Role::SuperAdmin).await;
    let token = login(&app, "root@ketaqwaan.com", "admin123").await;

    let response = client
        .put(format!(
            "{}/api/auth/users/{}/toggle-status",
            app.address,
            uuid::Uuid::new_v4()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
