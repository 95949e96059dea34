#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use jwt_bearer_auth::{
    app::build_router,
    config::{AuthConfig, HttpConfig, KeySource, KeySpec},
    services::auth::{KeySelection, build_auth_handler},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ISSUER_PRIVATE_PEM: &str = include_str!("../fixtures/issuer_private.pem");
pub const INTRUDER_PRIVATE_PEM: &str = include_str!("../fixtures/intruder_private.pem");
pub const ISSUER_CERT_B64: &str = include_str!("../fixtures/issuer_cert.b64");
pub const LEGACY_CERT_B64: &str = include_str!("../fixtures/legacy_cert.b64");

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn auth_config(keys: Option<Vec<KeySpec>>, verify_signature: bool) -> AuthConfig {
    AuthConfig {
        scheme_name: "Bearer".to_string(),
        scheme_case_sensitive: true,
        verify_signature,
        keys,
        key_selection: KeySelection::FirstMatch,
        max_token_bytes: 8 * 1024,
    }
}

pub fn rs256_cert(encoded: &str) -> KeySpec {
    KeySpec {
        algorithm: Algorithm::RS256,
        source: KeySource::Encoded(encoded.to_string()),
    }
}

pub fn app(config: &AuthConfig) -> Router {
    app_with_http(config, &HttpConfig::default())
}

pub fn app_with_http(config: &AuthConfig, http: &HttpConfig) -> Router {
    let auth = build_auth_handler(config).expect("auth handler");
    build_router(AppState::new(auth), http)
}

pub fn sign_rs256(private_pem: &str, claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("private key");
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).expect("sign")
}

pub fn issuer_token() -> String {
    sign_rs256(ISSUER_PRIVATE_PEM, &json!({ "sub": "client-42" }))
}

pub fn get(path: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_json(path: &str, authorization: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("json")))
        .expect("request")
}

pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.expect("infallible")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}
