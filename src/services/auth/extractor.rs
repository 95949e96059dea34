//! Bearer token extraction from `Authorization` headers.
//!
//! Knows nothing about token structure: an empty parameter comes back as an
//! empty token (`Some("")`), which is different from "no credential" (`None`).

use axum::http::{HeaderMap, header};

use super::options::SchemeOptions;

/// Returns the token from the first `Authorization` header whose scheme matches.
pub fn extract_token<'a>(headers: &'a HeaderMap, scheme: &SchemeOptions) -> Option<&'a str> {
    headers
        .get_all(header::AUTHORIZATION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| parse_credentials(v, scheme))
}

/// Splits `<Scheme> <token>`. `Bearer` alone (the transport usually trims the
/// trailing space) yields an empty token.
pub fn parse_credentials<'a>(value: &'a str, scheme: &SchemeOptions) -> Option<&'a str> {
    let value = value.trim_start();

    let (name, param) = match value.split_once(' ') {
        Some((name, param)) => (name, param.trim()),
        None => (value.trim_end(), ""),
    };

    scheme.matches(name).then_some(param)
}
