/// Factory: build `JwtAuthenticationHandler` from application `AuthConfig`.
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AuthConfig, KeySource, KeySpec};
use crate::services::auth::{
    JwtAuthenticationHandler, JwtAuthenticationOptions, VerificationKey,
    key_loader::{self, KeyError},
};

pub fn build_auth_handler(config: &AuthConfig) -> Result<Arc<JwtAuthenticationHandler>, KeyError> {
    let keys = config
        .keys
        .as_ref()
        .map(|specs| {
            specs
                .iter()
                .enumerate()
                .map(|(index, spec)| load_key(index, spec))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    match &keys {
        Some(keys) => {
            for key in keys {
                info!(alg = ?key.algorithm(), key_id = %key.key_id(), "verification key loaded");
            }
        }
        None if config.verify_signature => {
            warn!("no verification key configured; every token will be rejected")
        }
        None => {}
    }

    if !config.verify_signature {
        warn!("signature verification is DISABLED; token claims are trusted as-is");
    }

    let options = JwtAuthenticationOptions::default()
        .with_scheme(config.scheme_name.clone(), config.scheme_case_sensitive)
        .with_verify_signature(config.verify_signature)
        .with_keys(keys, config.key_selection)
        .with_max_token_bytes(config.max_token_bytes);

    Ok(Arc::new(JwtAuthenticationHandler::new(options)))
}

fn load_key(index: usize, spec: &KeySpec) -> Result<VerificationKey, KeyError> {
    match &spec.source {
        KeySource::Encoded(text) => {
            let rsa = key_loader::decode_rsa_key(text.as_bytes())?;
            Ok(VerificationKey::new(spec.algorithm, format!("rsa:{}", rsa.fingerprint), rsa.key))
        }
        KeySource::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| KeyError::Io {
                path: path.clone(),
                source,
            })?;
            let rsa = key_loader::decode_rsa_key(&bytes)?;
            Ok(VerificationKey::new(spec.algorithm, format!("rsa:{}", rsa.fingerprint), rsa.key))
        }
        // Secrets are never fingerprinted; the position is enough to tell them apart.
        KeySource::Secret(secret) => Ok(VerificationKey::new(
            spec.algorithm,
            format!("hmac#{index}"),
            key_loader::hmac_key(secret)?,
        )),
    }
}
