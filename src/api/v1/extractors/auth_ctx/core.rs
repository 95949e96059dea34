use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthenticatedIdentity;
use crate::state::AppState;

/// Handler で、認証済み identity を受け取るための extractor
/// middleware が AuthenticatedIdentity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct Authenticated(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AppError::unauthorized(state.auth.scheme_name()))
    }
}
