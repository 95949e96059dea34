//! JWT signature verification.
//!
//! `verify` is a pure function of (token, options): no I/O, no shared mutable
//! state, so the same token under the same options always gives the same answer.
//!
//! Claims are not interpreted here (no `exp`/`aud`/`iss` policy); only the
//! structure and the signature are checked.

use std::str::FromStr;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde_json::{Map, Value};

use super::algorithm::{AlgorithmProvider, KeyMaterial};
use super::options::JwtAuthenticationOptions;
use super::types::{AuthFailure, AuthenticatedIdentity};

type Claims = Map<String, Value>;

/// How signatures are treated, fixed at construction.
#[derive(Debug, Clone)]
pub enum SignatureValidation {
    /// Claims are trusted as-is. Insecure; opt-in only.
    Disabled,
    /// Signature must verify against a key from the provider.
    Required(Arc<dyn AlgorithmProvider>),
}

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    validation: SignatureValidation,
    max_token_bytes: usize,
}

/// Structurally valid compact JWS.
struct Segments<'a> {
    header: &'a str,
    payload: &'a str,
}

impl SignatureVerifier {
    pub fn new(options: &JwtAuthenticationOptions) -> Self {
        let validation = if options.verify_signature {
            SignatureValidation::Required(Arc::clone(&options.provider))
        } else {
            SignatureValidation::Disabled
        };

        Self {
            validation,
            max_token_bytes: options.max_token_bytes,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedIdentity, AuthFailure> {
        // Size is bounded before anything is decoded.
        if token.len() > self.max_token_bytes {
            return Err(AuthFailure::MalformedToken("token exceeds size limit"));
        }

        let segments = split_segments(token)?;

        let algorithm = declared_algorithm(segments.header)?;

        let provider = match &self.validation {
            SignatureValidation::Disabled => {
                let claims = decode_claims(segments.payload)?;
                return Ok(AuthenticatedIdentity::new(claims, algorithm, None, false));
            }
            SignatureValidation::Required(provider) => provider,
        };

        let candidates = provider.candidates(algorithm);
        if candidates.is_empty() {
            return Err(AuthFailure::UnknownOrUnconfiguredAlgorithm(
                algorithm_name(algorithm),
            ));
        }

        let mut failure = AuthFailure::InvalidSignature;

        for key in candidates {
            // Absent key material can never verify anything.
            let KeyMaterial::Present(decoding_key) = key.material() else {
                continue;
            };

            match verify_with(token, decoding_key, algorithm) {
                Ok(claims) => {
                    return Ok(AuthenticatedIdentity::new(
                        claims,
                        algorithm,
                        Some(key.key_id().to_string()),
                        true,
                    ));
                }
                Err(err) => failure = err,
            }
        }

        Err(failure)
    }
}

/// Exactly three non-empty base64url segments, no padding.
fn split_segments(token: &str) -> Result<Segments<'_>, AuthFailure> {
    if token.is_empty() {
        return Err(AuthFailure::MalformedToken("empty token"));
    }

    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthFailure::MalformedToken("expected three segments"));
    };

    for segment in [header, payload, signature] {
        if segment.is_empty() {
            return Err(AuthFailure::MalformedToken("empty segment"));
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(AuthFailure::MalformedToken("segment is not base64url"));
        }
    }

    Ok(Segments { header, payload })
}

/// Header must be a JSON object with a string `alg`. A name outside the
/// supported set (`none` included) is an unknown algorithm, not a malformed token.
fn declared_algorithm(header: &str) -> Result<Algorithm, AuthFailure> {
    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthFailure::MalformedToken("header is not base64url"))?;

    let header = serde_json::from_slice::<Map<String, Value>>(&bytes)
        .map_err(|_| AuthFailure::MalformedToken("header is not a JSON object"))?;

    let Some(Value::String(name)) = header.get("alg") else {
        return Err(AuthFailure::MalformedToken("header has no alg"));
    };

    Algorithm::from_str(name)
        .map_err(|_| AuthFailure::UnknownOrUnconfiguredAlgorithm(name.clone()))
}

fn algorithm_name(algorithm: Algorithm) -> String {
    // Algorithm の Debug 表記は JWA 名 (RS256 など) と一致する
    format!("{algorithm:?}")
}

fn decode_claims(payload: &str) -> Result<Claims, AuthFailure> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthFailure::MalformedToken("payload is not base64url"))?;

    serde_json::from_slice::<Claims>(&bytes)
        .map_err(|_| AuthFailure::MalformedToken("payload is not a JSON object"))
}

fn verify_with(
    token: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
) -> Result<Claims, AuthFailure> {
    let mut validation = Validation::new(algorithm);
    // Claims stay opaque: only the signature is enforced.
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;

    jsonwebtoken::decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                AuthFailure::MalformedToken("undecodable token")
            }
            ErrorKind::Json(_) => AuthFailure::MalformedToken("payload is not a JSON object"),
            _ => AuthFailure::InvalidSignature,
        })
}
