/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, 認証 scheme, 鍵素材, 署名検証の有無など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 鍵素材そのもののデコードは services::auth::key_loader の責務
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::services::auth::KeySelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where one configured key comes from. Decoded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Base64 DER or PEM text, inline in the environment.
    Encoded(String),
    /// Path to a PEM or DER file.
    File(PathBuf),
    /// HMAC shared secret.
    Secret(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub algorithm: Algorithm,
    pub source: KeySource,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub scheme_name: String,
    pub scheme_case_sensitive: bool,
    pub verify_signature: bool,
    /// `None` means no key material was configured at all.
    pub keys: Option<Vec<KeySpec>>,
    pub key_selection: KeySelection,
    pub max_token_bytes: usize,
}

/// Transport limits applied to every route (middleware::http).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub http: HttpConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` is this over the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let http = HttpConfig::from_lookup(&lookup)?;
        let auth = AuthConfig::from_lookup(&lookup)?;

        Ok(Self {
            addr,
            app_env,
            http,
            auth,
        })
    }
}

impl HttpConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let body_limit_bytes = match lookup("HTTP_BODY_LIMIT_BYTES") {
            Some(raw) => parse_positive(&raw, "HTTP_BODY_LIMIT_BYTES")?,
            None => defaults.body_limit_bytes,
        };

        let request_timeout = match lookup("HTTP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = parse_positive(&raw, "HTTP_REQUEST_TIMEOUT_SECS")?;
                Duration::from_secs(secs as u64)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            body_limit_bytes,
            request_timeout,
        })
    }
}

impl AuthConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let scheme_name = lookup("AUTH_SCHEME")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "Bearer".to_string());

        // token68 と同じく、空白や区切り文字を含む scheme は受け付けない
        if scheme_name.is_empty()
            || !scheme_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
        {
            return Err(ConfigError::Invalid("AUTH_SCHEME"));
        }

        let scheme_case_sensitive =
            parse_bool(lookup("AUTH_SCHEME_CASE_SENSITIVE"), true, "AUTH_SCHEME_CASE_SENSITIVE")?;

        let verify_signature =
            parse_bool(lookup("AUTH_VERIFY_SIGNATURE"), true, "AUTH_VERIFY_SIGNATURE")?;

        let rsa_algorithm = match lookup("AUTH_RSA_ALGORITHM") {
            Some(raw) => parse_rsa_algorithm(&raw)?,
            None => Algorithm::RS256,
        };

        let mut keys: Option<Vec<KeySpec>> = None;

        // 変数はあるのに中身が空 → 設定ミスとして扱う (鍵なしモードとは区別する)
        if let Some(raw) = lookup("AUTH_CERTIFICATES") {
            let entries = non_blank_list(&raw, "AUTH_CERTIFICATES")?
                .map(|s| KeySpec {
                    algorithm: rsa_algorithm,
                    // PEM を 1 行で渡せるように "\n" をエスケープで受け取る
                    source: KeySource::Encoded(s.replace("\\n", "\n")),
                })
                .collect::<Vec<_>>();
            keys.get_or_insert_with(Vec::new).extend(entries);
        }

        if let Some(raw) = lookup("AUTH_CERTIFICATE_FILES") {
            let entries = non_blank_list(&raw, "AUTH_CERTIFICATE_FILES")?
                .map(|s| KeySpec {
                    algorithm: rsa_algorithm,
                    source: KeySource::File(PathBuf::from(s)),
                })
                .collect::<Vec<_>>();
            keys.get_or_insert_with(Vec::new).extend(entries);
        }

        if let Some(raw) = lookup("AUTH_HMAC_SECRETS") {
            let entries = non_blank_list(&raw, "AUTH_HMAC_SECRETS")?
                .map(|s| KeySpec {
                    algorithm: Algorithm::HS256,
                    source: KeySource::Secret(s.to_string()),
                })
                .collect::<Vec<_>>();
            keys.get_or_insert_with(Vec::new).extend(entries);
        }

        let key_selection = match lookup("AUTH_KEY_SELECTION") {
            Some(raw) => raw
                .parse::<KeySelection>()
                .map_err(|_| ConfigError::Invalid("AUTH_KEY_SELECTION"))?,
            None => KeySelection::default(),
        };

        let max_token_bytes = match lookup("AUTH_MAX_TOKEN_BYTES") {
            Some(raw) => parse_positive(&raw, "AUTH_MAX_TOKEN_BYTES")?,
            None => 8 * 1024,
        };

        Ok(Self {
            scheme_name,
            scheme_case_sensitive,
            verify_signature,
            keys,
            key_selection,
            max_token_bytes,
        })
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank_list<'a>(
    raw: &'a str,
    key: &'static str,
) -> Result<impl Iterator<Item = &'a str>, ConfigError> {
    if split_list(raw).next().is_none() {
        return Err(ConfigError::Invalid(key));
    }
    Ok(split_list(raw))
}

fn parse_positive(raw: &str, key: &'static str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ConfigError::Invalid(key))
}

fn parse_bool(raw: Option<String>, default: bool, key: &'static str) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(key)),
    }
}

fn parse_rsa_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm =
        Algorithm::from_str(raw.trim()).map_err(|_| ConfigError::Invalid("AUTH_RSA_ALGORITHM"))?;

    match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(algorithm),
        _ => Err(ConfigError::Invalid("AUTH_RSA_ALGORITHM")),
    }
}
