/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストの identity (AuthenticatedIdentity) を handler に提供する
 * - 検証ロジックは services::auth 側、ここは受け渡しだけ
 *
 * Public API:
 * - Authenticated
 */

mod core;

pub use self::core::Authenticated;
