use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use polyfaq_cache::memory::DEFAULT_CAPACITY;
use polyfaq_core::cache_keys::FAQ_CACHE_TTL_SECS;
use polyfaq_translate::google::DEFAULT_TRANSLATE_URL;

use crate::auth::jwt::JwtConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Where FAQs and users are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Which cache fronts the FAQ listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    None,
}

impl FromStr for CacheBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `JWT_SECRET` (and `DATABASE_URL` for the Postgres
/// store) has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is Postgres.
    pub database_url: Option<String>,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    /// Entry limit of the `memory` cache backend (default: `512`).
    pub memory_cache_capacity: usize,
    /// TTL of each `faqs:<lang>` entry (default: one hour).
    pub faq_cache_ttl_secs: u64,
    pub translate_url: String,
    pub translate_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                                |
    /// |--------------------------|--------------------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                              |
    /// | `PORT`                   | `5000`                                                 |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`                                |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                                   |
    /// | `STORE_BACKEND`          | `postgres`                                             |
    /// | `DATABASE_URL`           | --                                                     |
    /// | `CACHE_BACKEND`          | `redis`                                                |
    /// | `REDIS_URL`              | `redis://127.0.0.1:6379`                               |
    /// | `MEMORY_CACHE_CAPACITY`  | `512`                                                  |
    /// | `FAQ_CACHE_TTL_SECS`     | `3600`                                                 |
    /// | `TRANSLATE_URL`          | `https://translate.googleapis.com/translate_a/single`  |
    /// | `TRANSLATE_TIMEOUT_SECS` | `10`                                                   |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_or("PORT", 5000u16)?;

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        )?;

        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", 30u64)?;
        let jwt = JwtConfig::from_env()?;

        let store_backend = env_or("STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let cache_backend = env_or("CACHE_BACKEND", CacheBackend::Redis)?;
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let memory_cache_capacity = env_or("MEMORY_CACHE_CAPACITY", DEFAULT_CAPACITY)?;
        let faq_cache_ttl_secs = env_or("FAQ_CACHE_TTL_SECS", FAQ_CACHE_TTL_SECS)?;

        let translate_url =
            std::env::var("TRANSLATE_URL").unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.into());
        let translate_timeout_secs = env_or("TRANSLATE_TIMEOUT_SECS", 10u64)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            store_backend,
            database_url,
            cache_backend,
            redis_url,
            memory_cache_capacity,
            faq_cache_ttl_secs,
            translate_url,
            translate_timeout_secs,
        })
    }

    pub fn faq_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.faq_cache_ttl_secs)
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }
}

/// Split a comma-separated origin list, rejecting values that cannot be
/// sent as a header.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: origin.to_string(),
            })
        })
        .collect()
}

/// Parse `var` if set, otherwise fall back to `default`.
pub(crate) fn env_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
