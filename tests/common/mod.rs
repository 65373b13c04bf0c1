//! Common test utilities for integration tests
//!
//! Shared setup for tests that exercise the router end to end.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sqlx::PgPool;
use tour_accounts_backend::{config::AppConfig, routes, state::AppState};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: PgPool,
}

impl TestApp {
    /// Create a test application over a real database
    pub async fn new() -> Self {
        let config = test_config();
        let pool = PgPool::connect(&config.database.url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(pool.clone(), config);
        let app = routes::create_router(state);

        Self { app, pool }
    }

    /// Create a test application without touching the database
    ///
    /// The pool is lazy, so health and liveness checks work even when
    /// no database is running.
    pub fn new_lazy() -> Self {
        let config = test_config();
        let pool = PgPool::connect_lazy(&config.database.url)
            .expect("Failed to create lazy pool");

        let state = AppState::new(pool.clone(), config);
        let app = routes::create_router(state);

        Self { app, pool }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Execute a GraphQL operation, returning the `data` object
    pub async fn graphql(&self, query: &str, variables: serde_json::Value) -> serde_json::Value {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let (status, response) = self.post("/graphql", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "unexpected status: {response}");

        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(
            response["errors"].is_null(),
            "unexpected errors: {}",
            response["errors"]
        );
        response["data"].clone()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

/// Test configuration; TEST_DATABASE_URL overrides the default
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
        config.database.url = url;
    }
    config.jwt.secret = "integration-test-secret".to_string();
    config
}
