//! HTTP API tests against an embedded database
//! Run: cargo test -p site-server --test api_routes

use std::path::Path;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use site_server::{Config, JwtConfig, ServerState, build_app};

const ADMIN_USER: &str = "admin";
const ADMIN_PASS: &str = "admin-password";

struct TestApp {
    _tmp: TempDir,
    state: ServerState,
    app: Router,
}

impl TestApp {
    async fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let jwt = JwtConfig {
            secret: "integration-test-secret-key-0123456789".into(),
            expiration_minutes: 60,
            issuer: "site-server".into(),
            audience: "site-admin".into(),
        };
        let mut config = Config::with_work_dir(tmp.path(), jwt);
        config.admin_username = ADMIN_USER.into();
        config.admin_password = Some(ADMIN_PASS.into());

        let state = ServerState::initialize(&config).await.unwrap();
        let app = build_app(state.clone());
        Self {
            _tmp: tmp,
            state,
            app,
        }
    }

    fn uploads(&self) -> &Path {
        &self.state.config.uploads_dir
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .json(
                "POST",
                "/api/auth/login",
                None,
                json!({ "username": ADMIN_USER, "password": ADMIN_PASS }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn write_upload(&self, name: &str) {
        tokio::fs::write(self.uploads().join(name), b"jpeg").await.unwrap();
    }
}

#[tokio::test]
async fn test_health_and_root_are_public() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "API is running");

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    assert_eq!(body["image_store"], "local");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let (status, body) = app.json("GET", "/api/auth/me", Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], ADMIN_USER);
    assert_eq!(body["role"], "admin");
    assert!(body.get("password_hash").is_none());

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": ADMIN_USER, "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_register_is_admin_only() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let (status, _) = app
        .json(
            "POST",
            "/api/auth/register",
            Some(&token),
            json!({ "username": "editor", "password": "editor-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/register",
            Some(&token),
            json!({ "username": "editor", "password": "editor-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1101);
}

#[tokio::test]
async fn test_mutations_require_admin() {
    let app = TestApp::new().await;
    let project = json!({
        "title": "Glass Facade",
        "category": "Facades",
        "location": "Downtown",
        "description": "Structural glazing"
    });

    let (status, _) = app.json("POST", "/api/projects", None, project.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let viewer = app
        .state
        .jwt_service
        .generate_token("user:viewer", "viewer", "viewer")
        .unwrap();
    let (status, body) = app
        .json("POST", "/api/projects", Some(&viewer), project)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
}

#[tokio::test]
async fn test_create_validates_payload() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let (status, body) = app
        .json(
            "POST",
            "/api/projects",
            Some(&token),
            json!({ "title": "", "category": "Facades", "location": "", "description": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["title"], "title is required");
}

#[tokio::test]
async fn test_project_update_and_delete_release_images() {
    let app = TestApp::new().await;
    let token = app.login().await;
    for name in ["a.jpg", "b.jpg", "keep.jpg"] {
        app.write_upload(name).await;
    }

    let (status, created) = app
        .json(
            "POST",
            "/api/projects",
            Some(&token),
            json!({
                "title": "Shopfront",
                "category": "Shopfronts",
                "location": "Market Road",
                "description": "Aluminium shopfront",
                "images": [
                    "/uploads/a.jpg",
                    "http://localhost:5000/uploads/b.jpg",
                    "https://images.unsplash.com/photo-1"
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {created}");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("project:"));

    let (status, updated) = app
        .json(
            "PUT",
            &format!("/api/projects/{id}"),
            Some(&token),
            json!({ "images": ["/uploads/a.jpg"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Shopfront");
    assert!(app.uploads().join("a.jpg").exists());
    assert!(!app.uploads().join("b.jpg").exists());

    let (status, body) = app
        .json("DELETE", &format!("/api/projects/{id}"), Some(&token), Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");
    assert!(!app.uploads().join("a.jpg").exists());
    assert!(app.uploads().join("keep.jpg").exists());

    let (status, body) = app.get(&format!("/api/projects/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_service_update_and_delete_release_images() {
    let app = TestApp::new().await;
    let token = app.login().await;
    for name in ["weld.jpg", "old-gate.jpg", "photo#1.jpg"] {
        app.write_upload(name).await;
    }

    let (status, created) = app
        .json(
            "POST",
            "/api/services",
            Some(&token),
            json!({
                "title": "Steel Gates",
                "description": "Custom gates",
                "icon": "DoorOpen",
                "details": "Powder coated steel",
                "features": ["Rust proof"],
                "images": ["/uploads/weld.jpg", "/uploads/old-gate.jpg", "/uploads/photo#1.jpg"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {created}");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .json(
            "PUT",
            &format!("/api/services/{id}"),
            Some(&token),
            json!({ "images": ["/uploads/weld.jpg", "/uploads/photo#1.jpg"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["images"].as_array().unwrap().len(), 2);
    assert!(app.uploads().join("weld.jpg").exists());
    assert!(app.uploads().join("photo#1.jpg").exists());
    assert!(!app.uploads().join("old-gate.jpg").exists());

    let (status, _) = app
        .json("DELETE", &format!("/api/services/{id}"), Some(&token), Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.uploads().join("weld.jpg").exists());
    assert!(!app.uploads().join("photo#1.jpg").exists());
}

#[tokio::test]
async fn test_client_photo_replacement() {
    let app = TestApp::new().await;
    let token = app.login().await;
    app.write_upload("old.jpg").await;
    app.write_upload("new.jpg").await;

    let (status, created) = app
        .json(
            "POST",
            "/api/clients",
            Some(&token),
            json!({
                "name": "Sara",
                "role": "Homeowner",
                "feedback": "Excellent finish",
                "image": "/uploads/old.jpg"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["rating"], 5);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .json(
            "PUT",
            &format!("/api/clients/{id}"),
            Some(&token),
            json!({ "image": "/uploads/new.jpg" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.uploads().join("old.jpg").exists());
    assert!(app.uploads().join("new.jpg").exists());

    let (status, body) = app
        .json(
            "PUT",
            &format!("/api/clients/{id}"),
            Some(&token),
            json!({ "rating": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_missing_records_return_not_found() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let (status, body) = app.get("/api/services/service:missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3101);

    let (status, body) = app
        .json(
            "PUT",
            "/api/clients/missing",
            Some(&token),
            json!({ "name": "Nobody" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3201);

    let (status, _) = app
        .json("DELETE", "/api/projects/missing", Some(&token), Value::Null)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_business_info_upsert() {
    let app = TestApp::new().await;
    let token = app.login().await;
    app.write_upload("shop1.jpg").await;

    let (status, body) = app.get("/api/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = app
        .json(
            "POST",
            "/api/info",
            Some(&token),
            json!({
                "contact": { "phone": "+1 555 0100" },
                "about": { "shopImages": ["/uploads/shop1.jpg"] }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "upsert failed: {body}");
    assert_eq!(body["contact"]["phone"], "+1 555 0100");
    assert_eq!(body["about"]["storyTitle"], "Our Story");

    let (status, body) = app
        .json(
            "PUT",
            "/api/info",
            Some(&token),
            json!({ "about": { "shopImages": [] } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact"]["phone"], "+1 555 0100");
    assert!(!app.uploads().join("shop1.jpg").exists());

    let (_, body) = app.get("/api/info").await;
    assert_eq!(body["about"]["shopImages"], json!([]));
}

#[tokio::test]
async fn test_uploads_are_served() {
    let app = TestApp::new().await;
    app.write_upload("served.jpg").await;

    let resp = app
        .app
        .clone()
        .oneshot(Request::get("/uploads/served.jpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/jpeg");

    let (status, _) = app.get("/uploads/missing.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/uploads/..secret.jpg").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4008);
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let boundary = "X-BOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );
    let req = Request::post("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);
}
