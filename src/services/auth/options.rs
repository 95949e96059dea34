/*
 * Responsibility
 * - 認証ハンドラに渡す設定 (scheme 名、署名検証の有無、鍵の解決方法、トークン長の上限)
 * - 起動時に 1 回だけ組み立て、以後は読み取り専用
 */
use std::sync::Arc;

use super::algorithm::{
    AlgorithmProvider, KeySelection, KeySetProvider, StaticAlgorithmProvider,
    UnconfiguredAlgorithmProvider, VerificationKey,
};

pub const DEFAULT_SCHEME: &str = "Bearer";
pub const DEFAULT_MAX_TOKEN_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct SchemeOptions {
    pub name: String,
    pub case_sensitive: bool,
}

impl SchemeOptions {
    pub fn matches(&self, candidate: &str) -> bool {
        if self.case_sensitive {
            candidate == self.name
        } else {
            candidate.eq_ignore_ascii_case(&self.name)
        }
    }
}

/// Authentication options. Defaults: scheme `Bearer` (case-sensitive),
/// signature verification on, no key configured.
#[derive(Debug, Clone)]
pub struct JwtAuthenticationOptions {
    pub scheme: SchemeOptions,
    pub verify_signature: bool,
    pub provider: Arc<dyn AlgorithmProvider>,
    pub max_token_bytes: usize,
}

impl Default for JwtAuthenticationOptions {
    fn default() -> Self {
        Self {
            scheme: SchemeOptions {
                name: DEFAULT_SCHEME.to_string(),
                case_sensitive: true,
            },
            verify_signature: true,
            provider: Arc::new(UnconfiguredAlgorithmProvider::new()),
            max_token_bytes: DEFAULT_MAX_TOKEN_BYTES,
        }
    }
}

impl JwtAuthenticationOptions {
    pub fn with_scheme(mut self, name: impl Into<String>, case_sensitive: bool) -> Self {
        self.scheme = SchemeOptions {
            name: name.into(),
            case_sensitive,
        };
        self
    }

    pub fn with_verify_signature(mut self, verify: bool) -> Self {
        self.verify_signature = verify;
        self
    }

    /// `None` keeps the unconfigured provider; one key becomes a static
    /// provider; several become a key set.
    pub fn with_keys(self, keys: Option<Vec<VerificationKey>>, selection: KeySelection) -> Self {
        let provider: Arc<dyn AlgorithmProvider> = match keys {
            None => Arc::new(UnconfiguredAlgorithmProvider::new()),
            Some(mut keys) if keys.len() == 1 => match keys.pop() {
                Some(key) => Arc::new(StaticAlgorithmProvider::new(key)),
                None => Arc::new(UnconfiguredAlgorithmProvider::new()),
            },
            Some(keys) => Arc::new(KeySetProvider::new(keys, selection)),
        };
        self.with_provider(provider)
    }

    /// Any other key resolution strategy plugs in here.
    pub fn with_provider(mut self, provider: Arc<dyn AlgorithmProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_max_token_bytes(mut self, max: usize) -> Self {
        self.max_token_bytes = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};

    use super::*;

    fn hmac(key_id: &str) -> VerificationKey {
        VerificationKey::new(Algorithm::HS256, key_id, DecodingKey::from_secret(b"k"))
    }

    #[test]
    fn scheme_match_honours_case_policy() {
        let strict = SchemeOptions {
            name: "Bearer".into(),
            case_sensitive: true,
        };
        assert!(strict.matches("Bearer"));
        assert!(!strict.matches("bearer"));

        let relaxed = SchemeOptions {
            name: "Bearer".into(),
            case_sensitive: false,
        };
        assert!(relaxed.matches("BEARER"));
        assert!(!relaxed.matches("Basic"));
    }

    #[test]
    fn key_count_picks_provider() {
        let none = JwtAuthenticationOptions::default().with_keys(None, KeySelection::FirstMatch);
        let key = none.provider.resolve(Algorithm::HS256).unwrap();
        assert!(!key.material().is_present());

        let one = JwtAuthenticationOptions::default()
            .with_keys(Some(vec![hmac("one")]), KeySelection::FirstMatch);
        assert_eq!(one.provider.resolve(Algorithm::HS256).unwrap().key_id(), "one");
        assert!(one.provider.resolve(Algorithm::RS256).is_none());

        let many = JwtAuthenticationOptions::default()
            .with_keys(Some(vec![hmac("a"), hmac("b")]), KeySelection::TryAll);
        assert_eq!(many.provider.candidates(Algorithm::HS256).len(), 2);
    }

    /// 鍵を引くたびに数える provider (差し替え可能であることの確認用)
    #[derive(Debug)]
    struct CountingProvider {
        key: VerificationKey,
        lookups: AtomicUsize,
    }

    impl AlgorithmProvider for CountingProvider {
        fn resolve(&self, declared: Algorithm) -> Option<&VerificationKey> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            (declared == self.key.algorithm()).then_some(&self.key)
        }
    }

    #[test]
    fn custom_provider_is_consulted_by_verifier() {
        let provider = Arc::new(CountingProvider {
            key: hmac("custom"),
            lookups: Default::default(),
        });
        let options = JwtAuthenticationOptions::default().with_provider(provider.clone());

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "svc" }),
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();

        let identity = crate::services::auth::SignatureVerifier::new(&options).verify(&token).unwrap();
        assert_eq!(identity.key_id.as_deref(), Some("custom"));
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 1);
    }
}
