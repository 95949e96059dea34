/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、それ以外は middleware::auth::access を route_layer で適用
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{cert::get_info, health::health, hello::hello};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(hello))
        .route("/cert/getinfo", post(get_info));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}
