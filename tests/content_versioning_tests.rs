use ketaqwaan_portal::{content::ContentKind, models::Role};

mod common;
use common::{seed_admin, spawn_app};

// The repo-wide versioning convention: POST appends a new active version
// and retires every previous one; PUT patches a version in place. These
// tests drive it end-to-end over the HTTP surface and then check the
// stored state through the repository handle.

#[tokio::test]
async fn create_version_retires_all_previous_versions() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "a@ketaqwaan.com", "admin123", Role::Admin).await;

    let post = |judul: &str| {
        let client = client.clone();
        let address = app.address.clone();
        let admin_id = admin.id.to_string();
        let body = serde_json::json!({
            "EkskulJudul": judul,
            "EkskulDeskripsi": "Daftar ekstrakurikuler",
            "EkskulSlide": [
                { "title": "Hadrah", "description": "Seni musik islami", "image": "hadrah.jpg" }
            ]
        });
        async move {
            client
                .post(format!("{}/api/ekskul", address))
                .header("x-user-id", admin_id)
                .json(&body)
                .send()
                .await
                .unwrap()
        }
    };

    let first = post("Versi 1").await;
    assert_eq!(first.status(), 201);
    let second = post("Versi 2").await;
    assert_eq!(second.status(), 201);

    // The read path serves only the second version.
    let response = client
        .get(format!("{}/api/ekskul", app.address))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ekskul"]["EkskulJudul"], "Versi 2");

    // History is retained: both versions are stored, one active.
    assert_eq!(app.repo.count_versions(ContentKind::Ekskul).await.unwrap(), 2);
    let active = app.repo.get_active(ContentKind::Ekskul).await.unwrap().unwrap();
    assert_eq!(active.data["EkskulJudul"], "Versi 2");
    assert!(active.is_active);
}

#[tokio::test]
async fn two_sequential_posts_by_different_admins() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let first_admin = seed_admin(&app, "first@ketaqwaan.com", "admin123", Role::Admin).await;
    let second_admin = seed_admin(&app, "second@ketaqwaan.com", "admin123", Role::Admin).await;

    for (admin, judul) in [(&first_admin, "Dari admin 1"), (&second_admin, "Dari admin 2")] {
        let response = client
            .post(format!("{}/api/ekskul", app.address))
            .header("x-user-id", admin.id.to_string())
            .json(&serde_json::json!({
                "EkskulJudul": judul,
                "EkskulDeskripsi": "Deskripsi",
                "EkskulSlide": []
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/api/ekskul", app.address))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ekskul"]["EkskulJudul"], "Dari admin 2");
    assert_eq!(
        body["ekskul"]["updatedBy"]["email"],
        "second@ketaqwaan.com"
    );

    assert_eq!(app.repo.count_versions(ContentKind::Ekskul).await.unwrap(), 2);
}

#[tokio::test]
async fn patch_updates_in_place_without_new_version() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "a@ketaqwaan.com", "admin123", Role::Admin).await;

    let response = client
        .post(format!("{}/api/struktur", app.address))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "Judul": "Struktur Organisasi",
            "JudulDeskripsi": "Kepengurusan",
            "TahunKepengurusan": "2024/2025",
            "members": ["Ketua", "Sekretaris"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    let id = created["struktur"]["id"].as_str().unwrap().to_string();

    let response = client
        .put(format!("{}/api/struktur/{}", app.address, id))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "Judul": "Struktur Organisasi",
            "JudulDeskripsi": "Kepengurusan inti",
            "TahunKepengurusan": "2025/2026",
            "members": ["Ketua", "Sekretaris", "Bendahara"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["message"], "Struktur updated successfully");
    assert_eq!(updated["struktur"]["id"].as_str().unwrap(), id);
    assert_eq!(updated["struktur"]["TahunKepengurusan"], "2025/2026");
    // Patch does not touch the active flag or grow the history.
    assert_eq!(updated["struktur"]["isActive"], true);
    assert_eq!(
        app.repo.count_versions(ContentKind::Struktur).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn patch_unknown_id_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "a@ketaqwaan.com", "admin123", Role::Admin).await;

    let response = client
        .put(format!(
            "{}/api/kegiatan/{}",
            app.address,
            uuid::Uuid::new_v4()
        ))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "KegiatanJudul": "PHBI",
            "KegiatanDeskripsi": "Peringatan hari besar",
            "KegiatanSlide": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Kegiatan not found");
}

#[tokio::test]
async fn resolver_is_idempotent_between_writes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "a@ketaqwaan.com", "admin123", Role::Admin).await;

    client
        .post(format!("{}/api/program-kerja", app.address))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "ProgramKerjaJudul": "Program Kerja",
            "ProgramKerjaDeskripsi": "Tahunan",
            "programs": [
                { "icon": "star", "title": "Kajian", "description": "Rutin", "date": "2025", "status": "Direncanakan" }
            ]
        }))
        .send()
        .await
        .unwrap();

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = client
            .get(format!("{}/api/program-kerja", app.address))
            .send()
            .await
            .unwrap();
        bodies.push(response.json::<serde_json::Value>().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn validation_failure_leaves_store_unchanged() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "a@ketaqwaan.com", "admin123", Role::Admin).await;

    // HeroDescription missing.
    let response = client
        .post(format!("{}/api/hero", app.address))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "HeroWelcomeText": "Welcome",
            "HeroPrimaryText": "X",
            "HeroSecondaryText": "Y"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "HeroDescription");

    // Nothing was inserted.
    assert_eq!(app.repo.count_versions(ContentKind::Hero).await.unwrap(), 0);
}

#[tokio::test]
async fn slide_element_fields_are_validated() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = seed_admin(&app, "a@ketaqwaan.com", "admin123", Role::Admin).await;

    let response = client
        .post(format!("{}/api/kegiatan", app.address))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "KegiatanJudul": "PHBI",
            "KegiatanDeskripsi": "Peringatan",
            "KegiatanSlide": [{ "title": "Maulid" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"KegiatanSlide[0].description"));
    assert!(fields.contains(&"KegiatanSlide[0].image"));
}
