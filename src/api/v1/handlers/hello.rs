/*
 * Responsibility
 * - GET / (認証必須)
 * - 認証済みなら 200 "Hello" を返すだけの保護リソース
 */
use axum::{http::header, response::IntoResponse};

use crate::api::v1::extractors::Authenticated;

pub async fn hello(Authenticated(identity): Authenticated) -> impl IntoResponse {
    tracing::debug!(subject = ?identity.subject, "hello");

    ([(header::CONTENT_TYPE, "text/json")], "Hello")
}
