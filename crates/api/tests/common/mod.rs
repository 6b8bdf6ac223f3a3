//! Shared test harness: the full router over in-memory backends.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use polyfaq_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_EXPIRY_HOURS};
use polyfaq_api::auth::password::hash_password;
use polyfaq_api::config::{CacheBackend, ServerConfig, StoreBackend};
use polyfaq_api::router::build_app_router;
use polyfaq_api::state::AppState;
use polyfaq_cache::MemoryCache;
use polyfaq_db::models::user::{CreateUser, User};
use polyfaq_db::store::{MemoryStore, UserStore};
use polyfaq_service::testing::ScriptedTranslator;
use polyfaq_service::FaqService;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: DEFAULT_EXPIRY_HOURS,
        },
        store_backend: StoreBackend::Memory,
        database_url: None,
        cache_backend: CacheBackend::Memory,
        redis_url: String::new(),
        memory_cache_capacity: 512,
        faq_cache_ttl_secs: 3600,
        translate_url: String::new(),
        translate_timeout_secs: 10,
    }
}

/// The application plus handles on its backends, so tests can seed data and
/// observe translator calls and cache contents.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub translator: Arc<ScriptedTranslator>,
    pub config: ServerConfig,
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over an in-memory store, an in-memory cache and a scripted translator.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new());
    let translator = Arc::new(ScriptedTranslator::new());

    let faqs = FaqService::new(store.clone(), cache.clone(), translator.clone())
        .with_cache_ttl(config.faq_cache_ttl());

    let state = AppState {
        users: store.clone(),
        faqs: Arc::new(faqs),
        store: store.clone(),
        cache: cache.clone(),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        cache,
        translator,
        config,
    }
}

impl TestApp {
    /// Insert a user directly into the store.
    pub async fn create_user(&self, email: &str, role: &str) -> User {
        let input = CreateUser {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        };
        self.store
            .create_user(&input)
            .await
            .expect("user creation should succeed")
    }

    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt)
            .expect("token generation should succeed")
    }

    /// Create an admin and return its bearer token.
    pub async fn admin_token(&self) -> String {
        let admin = self.create_user("admin@test.com", "admin").await;
        self.token_for(&admin)
    }

    /// Create a regular user and return its bearer token.
    pub async fn user_token(&self) -> String {
        let user = self.create_user("user@test.com", "user").await;
        self.token_for(&user)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(request(Method::GET, uri, None, None)).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(request(Method::POST, uri, None, Some(body))).await
    }

    pub async fn post_json_auth(
        &self,
        uri: &str,
        body: serde_json::Value,
        token: &str,
    ) -> Response<Body> {
        self.send(request(Method::POST, uri, Some(token), Some(body)))
            .await
    }

    pub async fn put_json_auth(
        &self,
        uri: &str,
        body: serde_json::Value,
        token: &str,
    ) -> Response<Body> {
        self.send(request(Method::PUT, uri, Some(token), Some(body)))
            .await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(request(Method::DELETE, uri, Some(token), None))
            .await
    }

    /// Create a canonical FAQ through the API and return its id.
    pub async fn create_faq(&self, token: &str, question: &str, answer: &str) -> i64 {
        let response = self
            .post_json_auth(
                "/api/v1/faqs",
                serde_json::json!({ "question": question, "answer": answer }),
                token,
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        body_json(response).await["faq"]["id"]
            .as_i64()
            .expect("faq id must be numeric")
    }
}

/// Build a request with an optional bearer token and JSON body.
pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
