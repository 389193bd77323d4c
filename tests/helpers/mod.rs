//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use tokengate_api::{AppState, build_router};
use tokengate_auth::MemoryCredentialStore;
use tokengate_core::config::AppConfig;

/// Secret the test router signs with.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Password used for every user created through [`TestApp::signup`].
pub const TEST_PASSWORD: &str = "password123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for direct inspection
    pub store: Arc<MemoryCredentialStore>,
}

/// Parsed response
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A user created through the signup endpoint
#[derive(Debug, Clone)]
pub struct SignedUp {
    /// Subject id
    pub user_id: String,
    /// Access token
    pub token: String,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.auth.password_hash_cost = 1;
    config.database.url = "postgres://unused".to_string();
    config
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryCredentialStore::new());
        let state = AppState::build(test_config(), store.clone()).expect("Failed to build state");
        Self {
            router: build_router(state),
            store,
        }
    }

    /// Send a JSON request, passing `token` in the `token` header
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let headers: Vec<(&str, String)> = token
            .map(|t| vec![("token", t.to_string())])
            .unwrap_or_default();
        self.request_with_headers(method, path, body, &headers).await
    }

    /// Send a JSON request with arbitrary extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Sign up a user with [`TEST_PASSWORD`]
    pub async fn signup(&self, email: &str, phone: &str, user_type: &str) -> SignedUp {
        let response = self
            .request(
                "POST",
                "/auth/signup",
                Some(json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "first_name": "Test",
                    "last_name": "User",
                    "phone": phone,
                    "user_type": user_type,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "signup failed: {}", response.body);

        SignedUp {
            user_id: response.body["user_id"]
                .as_str()
                .expect("user_id missing")
                .to_string(),
            token: response.body["token"]
                .as_str()
                .expect("token missing")
                .to_string(),
        }
    }
}
