#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use intervue::intervue_auth::{Claims, Role, create_access_token, encode_claims};
use intervue::intervue_config::{
    CorsConfig, JwtConfig, PasswordConfig, ServerConfig, UploadConfig,
};
use intervue::intervue_storage::UploadGuard;
use intervue::router::init_router;
use intervue::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

#[derive(Clone, Copy, Debug)]
pub struct TestOptions {
    pub development: bool,
    pub max_bytes: u64,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            development: false,
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default())
}

pub fn setup_test_app_with(options: TestOptions) -> TestApp {
    let upload_dir = std::env::temp_dir().join(format!("intervue-test-{}", Uuid::new_v4()));

    let mut upload_config = UploadConfig::with_dir(&upload_dir);
    upload_config.max_bytes = options.max_bytes;

    let server_config = ServerConfig::from_vars(|key| match key {
        "APP_ENV" if options.development => Some("development".to_string()),
        _ => None,
    });

    let state = AppState::new(
        jwt_config(),
        PasswordConfig { cost: 4 },
        server_config,
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        UploadGuard::new(upload_config).unwrap(),
    );

    TestApp {
        router: init_router(state.clone()),
        upload_dir: state.uploads.dir().to_path_buf(),
        state,
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        token: Option<&str>,
        form: MultipartForm,
    ) -> (StatusCode, Value) {
        let (content_type, body) = form.finish();
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Creates a question through the API and returns its id.
    pub async fn create_question(&self) -> String {
        let token = token(Role::Interviewer);
        let (status, body) = self
            .post_json(
                "/api/questions",
                Some(&token),
                json!({
                    "prompt": "Tell us about a production incident you handled.",
                    "category": "behavioral",
                    "expected_answer": "Situation, task, action, result."
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn token(role: Role) -> String {
    token_for(&Uuid::new_v4().to_string(), role)
}

pub fn token_for(subject: &str, role: Role) -> String {
    create_access_token(subject, role, &jwt_config()).unwrap()
}

pub fn expired_token(role: Role) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        role,
        iat: now - 7200,
        exp: now - 60,
    };
    encode_claims(&claims, &jwt_config()).unwrap()
}

pub fn generate_unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}+{}", Uuid::new_v4().simple(), email)
}

pub fn generate_name() -> String {
    Name().fake()
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("intervue-boundary-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
