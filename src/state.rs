/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: 起動時に 1 回だけ組み立てた JwtAuthenticationHandler
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::JwtAuthenticationHandler;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<JwtAuthenticationHandler>,
}

impl AppState {
    pub fn new(auth: Arc<JwtAuthenticationHandler>) -> Self {
        Self { auth }
    }
}
