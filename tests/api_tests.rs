use ketaqwaan_portal::models::Role;

mod common;
use common::{seed_admin, spawn_app};

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/does-not-exist", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_hero_end_to_end() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "editor@ketaqwaan.com", "admin123", Role::Admin).await;

    // Publish a hero section as admin (local dev bypass header).
    let response = client
        .post(format!("{}/api/hero", app.address))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "HeroWelcomeText": "Welcome",
            "HeroPrimaryText": "X",
            "HeroSecondaryText": "Y",
            "HeroDescription": "Z"
        }))
        .send()
        .await
        .expect("post fail");
    assert_eq!(response.status(), 201);

    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["message"], "Hero section created successfully");
    assert_eq!(created["heroSection"]["HeroWelcomeText"], "Welcome");
    assert_eq!(
        created["heroSection"]["updatedBy"]["email"],
        "editor@ketaqwaan.com"
    );

    // The public read path immediately serves the same document.
    let response = client
        .get(format!("{}/api/hero", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let hero = &body["heroSection"];
    assert_eq!(hero["HeroWelcomeText"], "Welcome");
    assert_eq!(hero["HeroPrimaryText"], "X");
    assert_eq!(hero["HeroSecondaryText"], "Y");
    assert_eq!(hero["HeroDescription"], "Z");
    // Internal check: the served version is the active one.
    assert_eq!(hero["isActive"], true);
}

#[tokio::test]
async fn test_public_read_before_any_publish_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/ekskul", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Ekskul data not found");
}

#[tokio::test]
async fn test_config_sections_always_readable() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for (path, key) in [
        ("navbar", "navbar"),
        ("footer", "footer"),
        ("informasi", "informasi"),
        ("saran", "saran"),
    ] {
        let response = client
            .get(format!("{}/api/{}", app.address, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "GET /api/{} should be 200", path);

        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body[key].is_object(), "{} envelope key missing", key);
    }
}

#[tokio::test]
async fn test_content_write_requires_authentication() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/hero", app.address))
        .json(&serde_json::json!({
            "HeroWelcomeText": "Welcome",
            "HeroPrimaryText": "X",
            "HeroSecondaryText": "Y",
            "HeroDescription": "Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No token, authorization denied");
}
