/// Shared helpers for API integration tests
///
/// Every test gets its own router over a fresh `MemoryStore`, so tests never
/// see each other's data and need no database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tasklist_api::app::{build_router, AppState};
use tasklist_api::config::Config;
use tasklist_shared::store::{memory::MemoryStore, UserStore};
use tower::Service as _;

pub const PASSWORD: &str = "correct horse battery staple";

/// Router plus direct handle on its store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub config: Config,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::for_testing();
        let store = Arc::new(MemoryStore::new());
        let app = build_router(AppState::with_store(store.clone(), config.clone()));

        Self { app, store, config }
    }

    /// Sends a request, with an optional bearer token and JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Sends a prebuilt request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn register(&self, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers `email` and returns an access token for it
    pub async fn token_for(&self, email: &str) -> String {
        let registered = self.register(email).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let logged_in = self.login(email, PASSWORD).await;
        assert_eq!(logged_in.status, StatusCode::OK, "{}", logged_in.body);

        logged_in.body["access_token"].as_str().unwrap().to_string()
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let response = self
            .request("POST", "/api/tasks", Some(token), Some(json!({ "title": title })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    /// Stored password hash, read around the HTTP layer
    pub async fn stored_hash(&self, email: &str) -> String {
        self.store
            .find_user_by_email(email)
            .await
            .unwrap()
            .unwrap()
            .password_hash
    }
}
