/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, JWT 検証鍵, iss/aud など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
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

/// Access-token verification key.
#[derive(Clone)]
pub enum TokenKey {
    /// Ed25519 public key (SPKI PEM), EdDSA tokens.
    Ed25519PublicPem(String),
    /// Base64 HMAC secret, HS256 tokens.
    HmacSecret(String),
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
            Self::HmacSecret(_) => f.write_str("HmacSecret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub token_key: TokenKey,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source (env in production, maps in tests).
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env =
            AppEnv::parse(&var("APP_ENV").unwrap_or_else(|| "development".to_string()));

        let database_url =
            non_empty(var("DATABASE_URL")).ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5)?;

        // A public key wins over a shared secret when both are present.
        let token_key = match (
            non_empty(var("ACCESS_JWT_PUBLIC_KEY_PEM")),
            non_empty(var("ACCESS_JWT_SECRET")),
        ) {
            (Some(pem), _) => TokenKey::Ed25519PublicPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => TokenKey::HmacSecret(secret),
            (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
        };

        let auth_issuer = non_empty(var("AUTH_ISSUER"));
        let auth_audience = non_empty(var("AUTH_AUDIENCE"));

        let access_token_leeway_seconds = parse_or(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        let request_timeout_seconds = parse_or(&var, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            token_key,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            request_timeout_seconds,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(var(key)) {
        Some(s) => s.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
