//! JWT bearer 認証 → AuthenticatedIdentity を extensions に入れる
//!
//! - 判定そのものは `JwtAuthenticationHandler::authenticate` (services 側) が持つ
//! - ここは pipeline 側の責務だけ: 成功 → next へ / 失敗 → challenge (401)
//! - body を読む前に判定するので、未認証リクエストは handler に届かない

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::AuthenticateResult;
use crate::state::AppState;

/// 保護したい router に認証を掛ける。
///
/// `route_layer` なので、マッチしないパス (404) には認証を掛けない。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/", get(hello));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match state.auth.authenticate(req.headers()) {
        AuthenticateResult::Succeeded(identity) => {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        // 理由は authenticate 側でログ済み。レスポンスには出さない
        AuthenticateResult::Failed(_) => state.auth.challenge(),
    }
}
