/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, APP_ENV, body limit, AUTH_TOKENS など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

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

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One `AUTH_TOKENS` entry: `token=user[:perm|perm]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub user: String,
    pub permissions: Vec<String>,
}

impl FromStr for TokenGrant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (token, rest) = s.split_once('=').ok_or(ConfigError::Invalid("AUTH_TOKENS"))?;
        let (user, perms) = match rest.split_once(':') {
            Some((user, perms)) => (user, perms),
            None => (rest, ""),
        };

        let token = token.trim();
        let user = user.trim();
        if token.is_empty() || user.is_empty() {
            return Err(ConfigError::Invalid("AUTH_TOKENS"));
        }

        let permissions = perms
            .split('|')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            token: token.to_string(),
            user: user.to_string(),
            permissions,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub app_name: String,

    pub max_body_bytes: usize,
    pub request_timeout: Duration,

    pub auth_tokens: Vec<TokenGrant>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (env, test fixtures).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let app_name = lookup("APP_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "app".to_string());

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("MAX_BODY_BYTES"))?,
            None => 1024 * 1024,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(v) => Duration::from_secs(
                v.parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            ),
            None => Duration::from_secs(30),
        };

        let auth_tokens = lookup("AUTH_TOKENS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(TokenGrant::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            addr,
            app_env,
            app_name,
            max_body_bytes,
            request_timeout,
            auth_tokens,
        })
    }
}
