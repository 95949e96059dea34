/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: JWT bearer 認証 / http: request-id, trace, body limit, timeout
 */
pub mod auth;
pub mod http;
