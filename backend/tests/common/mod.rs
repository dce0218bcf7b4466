//! Common test utilities for integration tests
//!
//! Every `TestApp` owns a private SQLite database with migrations applied,
//! either in memory or in a temporary file when several connections must
//! race each other, so tests are isolated and need no external services.

#![allow(dead_code)]

use accounts_backend::{config::AppConfig, db, routes, state::AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fake::{faker::internet::en::Username, Fake};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::Path;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create in-memory database");
        Self::with_pool(pool).await
    }

    /// App over a database file in `dir`, served by a multi-connection pool
    pub async fn with_file_db(dir: &Path, max_connections: u32) -> Self {
        let url = format!("sqlite://{}", dir.join("accounts.db").display());
        let pool = db::create_pool(&url, max_connections)
            .await
            .expect("Failed to create file database");
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Self {
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(pool.clone(), test_config());
        let app = routes::create_router(state.clone());

        Self { app, pool, state }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        call(self.app.clone(), request).await
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a GET request with a Bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.send(bearer_get(path, token)).await
    }

    /// Make a POST request with a raw JSON body
    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, Value) {
        self.send(json_post(path, body)).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(path, &body.to_string()).await
    }

    pub async fn register(&self, username: &str, password: &str, email: Option<&str>) -> StatusCode {
        let mut body = json!({ "username": username, "password": password });
        if let Some(email) = email {
            body["email"] = json!(email);
        }
        self.post("/api/auth/register/", body).await.0
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login/",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Register and log in a fresh user, returning (username, access, refresh)
    pub async fn create_logged_in_user(&self, password: &str) -> (String, String, String) {
        let username = random_username();
        assert_eq!(self.register(&username, password, None).await, StatusCode::CREATED);

        let (status, tokens) = self.login(&username, password).await;
        assert_eq!(status, StatusCode::OK);

        (
            username,
            tokens["access"].as_str().unwrap().to_string(),
            tokens["refresh"].as_str().unwrap().to_string(),
        )
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn password_hash_of(&self, username: &str) -> String {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

/// Drive one request through a router, returning status and JSON body
pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

pub fn json_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer_get(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn random_username() -> String {
    let base: String = Username().fake();
    format!("{}_{}", base, uuid::Uuid::new_v4().simple())
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config
}
