//! End-to-end tests through the real router (`app::build_router`).
//!
//! Identity lookups use `InMemoryIdentityStore`; tokens are signed here
//! as fixtures.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

use bearer_gate::app::build_router;
use bearer_gate::config::Config;
use bearer_gate::repos::InMemoryIdentityStore;
use bearer_gate::security::Identity;
use bearer_gate::services::auth::build_authenticator;
use bearer_gate::state::AppState;

const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
const ED_PRIVATE: &str = include_str!("fixtures/ed25519_private.pem");
const ED_PUBLIC: &str = include_str!("fixtures/ed25519_public.pem");

const ISSUER: &str = "https://auth.example.test";
const AUDIENCE: &str = "bearer-gate";

fn config(key: (&str, String)) -> Config {
    Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some("postgres://unused/test".to_string()),
        "AUTH_ISSUER" => Some(ISSUER.to_string()),
        "AUTH_AUDIENCE" => Some(AUDIENCE.to_string()),
        "ACCESS_TOKEN_LEEWAY_SECONDS" => Some("0".to_string()),
        n if n == key.0 => Some(key.1.clone()),
        _ => None,
    })
    .unwrap()
}

fn store() -> InMemoryIdentityStore {
    InMemoryIdentityStore::new()
        .with_identity(Identity::new("42").with_authorities(["user", "reader"]))
        .with_identity(
            Identity::new("carol@example.test")
                .with_authorities(["user"])
                .with_credentials_changed_at(Utc::now() - Duration::hours(1)),
        )
}

fn app_with(config: Config) -> Router {
    let auth = build_authenticator(&config, Arc::new(store())).unwrap();
    build_router(AppState::new(auth), &config)
}

fn hs256_app() -> Router {
    app_with(config(("ACCESS_JWT_SECRET", STANDARD.encode(SECRET))))
}

fn claims(sub: &str, exp_offset: i64) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "sub": sub,
        "iss": ISSUER,
        "aud": AUDIENCE,
        "iat": now,
        "exp": now + exp_offset,
    })
}

fn hs256(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

async fn get(app: &Router, path: &str, authorization: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = hs256_app();

    let resp = get(&app, "/health", Some("Bearer garbage")).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_request_reaches_handler() {
    let app = hs256_app();

    let resp = get(&app, "/api/v1/whoami", None).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "authenticated": false }));
}

#[tokio::test]
async fn wrong_scheme_is_anonymous() {
    let app = hs256_app();

    let resp = get(&app, "/api/v1/whoami", Some("Token abc123")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["authenticated"], json!(false));
}

#[tokio::test]
async fn valid_token_exposes_identity() {
    let app = hs256_app();
    let token = hs256(&claims("42", 300));

    let resp = get(&app, "/api/v1/me", Some(&format!("Bearer {token}"))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({ "id": "42", "authorities": ["reader", "user"] })
    );
}

#[tokio::test]
async fn me_requires_identity_but_middleware_does_not() {
    let app = hs256_app();

    let resp = get(&app, "/api/v1/me", None).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = hs256_app();

    let resp = get(&app, "/api/v1/whoami", Some("Bearer garbage")).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        r#"Bearer error="invalid_token""#
    );
}

#[tokio::test]
async fn invalid_tokens_are_rejected_uniformly() {
    let app = hs256_app();

    let expired = hs256(&claims("42", -3600));
    let unknown = hs256(&claims("99", 300));
    let forged = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims("42", 300),
        &EncodingKey::from_secret(b"forged-secret-forged-secret-forged"),
    )
    .unwrap();
    let mut wrong_audience = claims("42", 300);
    wrong_audience["aud"] = json!("someone-else");
    let wrong_audience = hs256(&wrong_audience);

    let mut bodies = Vec::new();
    for token in ["garbage".to_string(), expired, unknown, forged, wrong_audience] {
        let resp = get(&app, "/api/v1/whoami", Some(&format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "token {token}");
        bodies.push(json_body(resp).await);
    }

    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(bodies[0]["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn token_issued_before_credential_change_is_rejected() {
    let app = hs256_app();
    let mut stale = claims("carol@example.test", 300);
    stale["iat"] = json!((Utc::now() - Duration::hours(2)).timestamp());

    let resp = get(&app, "/api/v1/me", Some(&format!("Bearer {}", hs256(&stale)))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let fresh = hs256(&claims("carol@example.test", 300));
    let resp = get(&app, "/api/v1/me", Some(&format!("Bearer {fresh}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn identity_does_not_leak_into_next_request() {
    let app = hs256_app();
    let token = hs256(&claims("42", 300));

    let first = get(&app, "/api/v1/whoami", Some(&format!("Bearer {token}"))).await;
    assert_eq!(json_body(first).await["authenticated"], json!(true));

    let second = get(&app, "/api/v1/whoami", None).await;
    assert_eq!(json_body(second).await["authenticated"], json!(false));
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = hs256_app();

    let resp = get(&app, "/api/v1/whoami", None).await;

    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn eddsa_tokens_verify_with_public_key() {
    let app = app_with(config(("ACCESS_JWT_PUBLIC_KEY_PEM", ED_PUBLIC.to_string())));

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::EdDSA),
        &claims("42", 300),
        &EncodingKey::from_ed_pem(ED_PRIVATE.as_bytes()).unwrap(),
    )
    .unwrap();

    let resp = get(&app, "/api/v1/me", Some(&format!("Bearer {token}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["id"], "42");

    // an HS256 token is not accepted by an EdDSA-configured validator
    let hs = hs256(&claims("42", 300));
    let resp = get(&app, "/api/v1/me", Some(&format!("Bearer {hs}"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
