use jsonwebtoken::Algorithm;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a request could not be authenticated.
///
/// Internal diagnostics only: every variant becomes the same 401 challenge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("no credential for the configured scheme")]
    MissingCredential,
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),
    /// Declared `alg` as written in the header: unsupported, or no key configured for it.
    #[error("no verification key for algorithm {0}")]
    UnknownOrUnconfiguredAlgorithm(String),
    #[error("invalid signature")]
    InvalidSignature,
}

impl AuthFailure {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedToken(_) => "malformed_token",
            Self::UnknownOrUnconfiguredAlgorithm(_) => "unknown_algorithm",
            Self::InvalidSignature => "invalid_signature",
        }
    }
}

/// Identity produced by a successful authentication.
///
/// - `claims` are passed through untouched; `subject` is `sub` lifted for convenience.
/// - `signature_verified` is false only when verification is switched off.
/// - `key_id` names the key that verified the token (log correlation).
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedIdentity {
    pub subject: Option<String>,
    pub algorithm: Algorithm,
    pub key_id: Option<String>,
    pub signature_verified: bool,
    pub claims: Map<String, Value>,
}

impl AuthenticatedIdentity {
    pub(crate) fn new(
        claims: Map<String, Value>,
        algorithm: Algorithm,
        key_id: Option<String>,
        signature_verified: bool,
    ) -> Self {
        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            subject,
            algorithm,
            key_id,
            signature_verified,
            claims,
        }
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}

/// Outcome of one `authenticate` call.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticateResult {
    Succeeded(AuthenticatedIdentity),
    Failed(AuthFailure),
}

impl From<Result<AuthenticatedIdentity, AuthFailure>> for AuthenticateResult {
    fn from(result: Result<AuthenticatedIdentity, AuthFailure>) -> Self {
        match result {
            Ok(identity) => Self::Succeeded(identity),
            Err(failure) => Self::Failed(failure),
        }
    }
}
