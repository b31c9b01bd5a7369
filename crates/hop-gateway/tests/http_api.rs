use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::Router;
use hop_auth::{AuthError, IdentityProvider, StaticAuthority};
use hop_cache::MokaCacheStore;
use hop_core::{AccessAuthority, Alias, CacheStore, DurableStore, RecordId, UserId};
use hop_gateway::{App, AppState};
use hop_shortener::{AliasService, ServiceConfig};
use hop_storage::InMemoryStore;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &[u8] = b"test-secret";
const ADMIN: UserId = 1000;

struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn login(&self, placeholder: &str, password: &str) -> Result<String, AuthError> {
        if placeholder == "alice" && password == "hunter2" {
            Ok(token(1))
        } else {
            Err(AuthError::InvalidCredentials("bad password".into()))
        }
    }

    async fn register(&self, _: &str, username: &str, _: &str) -> Result<UserId, AuthError> {
        if username == "taken" {
            Err(AuthError::AlreadyExists(username.into()))
        } else {
            Ok(77)
        }
    }
}

/// A durable store that never answers.
struct StalledStore;

#[async_trait]
impl DurableStore for StalledStore {
    async fn save_url(&self, _: &Alias, _: &str, _: UserId) -> hop_core::store::Result<RecordId> {
        std::future::pending().await
    }

    async fn get_url(&self, _: &Alias) -> hop_core::store::Result<String> {
        std::future::pending().await
    }

    async fn creator(&self, _: &Alias) -> hop_core::store::Result<UserId> {
        std::future::pending().await
    }

    async fn delete_url(&self, _: &Alias) -> hop_core::store::Result<bool> {
        std::future::pending().await
    }
}

fn token(uid: UserId) -> String {
    encode(
        &Header::default(),
        &json!({ "uid": uid }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

fn state() -> AppState {
    state_with(Arc::new(InMemoryStore::new()))
}

fn state_with(durable: Arc<dyn DurableStore>) -> AppState {
    let cache: Arc<dyn CacheStore> = Arc::new(MokaCacheStore::new());
    let authority: Arc<dyn AccessAuthority> = Arc::new(StaticAuthority::new([ADMIN]));
    let service = AliasService::new(ServiceConfig::default(), cache, durable, authority);

    AppState::new(service, SECRET, "https://hop.test")
}

fn app() -> Router {
    App::router(state().with_identity(Arc::new(FakeIdentity)))
}

fn json_request(method: &str, uri: &str, body: Value, uid: Option<UserId>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(uid) = uid {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token(uid)));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, uid: Option<UserId>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(uid) = uid {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token(uid)));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn shorten(app: &Router, url: &str, alias: Option<&str>, uid: UserId) -> (StatusCode, Value) {
    let body = match alias {
        Some(alias) => json!({ "url": url, "alias": alias }),
        None => json!({ "url": url }),
    };
    let response = app
        .clone()
        .oneshot(json_request("POST", "/url", body, Some(uid)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn health() {
    let response = app()
        .oneshot(empty_request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn shorten_redirect_delete() {
    let app = app();

    let (status, body) = shorten(&app, "https://example.com", None, 42).await;
    assert_eq!(status, StatusCode::OK);
    let alias = body["alias"].as_str().unwrap().to_string();
    assert_eq!(alias.len(), 6);
    assert_eq!(body["info"], format!("https://hop.test/{alias}"));

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/{alias}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "https://example.com");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/{alias}"), Some(42)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/{alias}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shorten_requires_token() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/url",
            json!({ "url": "https://example.com" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("POST")
        .uri("/url")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, "Bearer forged")
        .body(Body::from(json!({ "url": "https://example.com" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid token");
}

#[tokio::test]
async fn duplicate_and_reserved_aliases_are_not_acceptable() {
    let app = app();

    let (status, _) = shorten(&app, "https://a.example", Some("mine"), 1).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = shorten(&app, "https://b.example", Some("mine"), 2).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["error"], "alias already exists");

    let (status, body) = shorten(&app, "https://b.example", Some("url"), 2).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["error"], "alias is reserved");
}

#[tokio::test]
async fn bad_input_is_rejected() {
    let app = app();

    let (status, _) = shorten(&app, "not a url", None, 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = shorten(&app, "https://example.com", Some("bad alias!"), 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request("POST", "/url", json!({ "link": "x" }), Some(1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_authorization() {
    let app = app();
    shorten(&app, "https://example.com", Some("owned"), 1).await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/owned", Some(2)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/owned", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/owned", Some(ADMIN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/owned", Some(ADMIN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("DELETE", "/owned", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_or_malformed_alias_is_not_found() {
    let app = app();

    for path in ["/missing", "/way-too-long-alias-way-too-long-alias-way-too-long-alias-way-too-long"] {
        let response = app
            .clone()
            .oneshot(empty_request("GET", path, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn login_and_register() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "placeholder": "alice", "password": "hunter2" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");

    // The issued token is accepted by the shortener routes
    let access_token = body["access_token"].as_str().unwrap().to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/url")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {access_token}"))
        .body(Body::from(json!({ "url": "https://example.com" }).to_string()))
        .unwrap();
    assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "placeholder": "alice", "password": "wrong" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "email": "bob@example.com", "username": "bobby", "password": "Passw0rdX" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user_id"], 77);

    let response = app
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "email": "t@example.com", "username": "taken", "password": "Passw0rdX" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn identity_routes_need_a_provider() {
    let app = App::router(state());

    let response = app
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "placeholder": "alice", "password": "hunter2" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn slow_requests_time_out() {
    let app = App::router_with_timeout(
        state_with(Arc::new(StalledStore)),
        Duration::from_millis(50),
    );

    let requests = [
        empty_request("GET", "/slow", None),
        json_request(
            "POST",
            "/url",
            json!({ "url": "https://example.com", "alias": "slow" }),
            Some(1),
        ),
        empty_request("DELETE", "/slow", Some(1)),
    ];
    for request in requests {
        let uri = request.uri().clone();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT, "{uri}");
        assert!(response.headers().contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/health", None))
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);

    let request = Request::builder()
        .uri("/missing")
        .header("x-request-id", "client-supplied-1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-request-id"], "client-supplied-1");
}
