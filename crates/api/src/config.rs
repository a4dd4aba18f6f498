use axum::http::HeaderValue;
use igprofile_cloud::s3::{default_public_url, S3Settings, DEFAULT_BUCKET};
use igprofile_core::freshness::{CachePolicy, DEFAULT_CACHE_TTL_DAYS};

/// Default provider base URL.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.hikerapi.com";

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Provider connection settings.
#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub access_key: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Server configuration loaded once at startup and passed into the app.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled database connections (default: `5`).
    pub database_max_connections: u32,
    /// Upstream provider settings.
    pub provider: ProviderConfig,
    /// Cache freshness policy (default TTL: 30 days).
    pub cache_policy: CachePolicy,
    /// Picture bucket settings; `None` disables mirroring.
    pub storage: Option<S3Settings>,
    /// Mirror profile pictures into the bucket (default: `true`).
    pub mirror_profile_pictures: bool,
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    ///
    /// | Env Var                     | Default                        |
    /// |-----------------------------|--------------------------------|
    /// | `HOST`                      | `0.0.0.0`                      |
    /// | `PORT`                      | `3000`                         |
    /// | `CORS_ORIGINS`              | `*`                            |
    /// | `DATABASE_URL`              | required                       |
    /// | `DATABASE_MAX_CONNECTIONS`  | `5`                            |
    /// | `HIKERAPI_KEY`              | required                       |
    /// | `HIKERAPI_BASE_URL`         | `https://api.hikerapi.com`     |
    /// | `CACHE_TTL_DAYS`            | `30`                           |
    /// | `STORAGE_ENDPOINT`          | unset (mirroring disabled)     |
    /// | `STORAGE_REGION`            | `us-east-1`                    |
    /// | `STORAGE_ACCESS_KEY_ID`     | required with endpoint         |
    /// | `STORAGE_SECRET_ACCESS_KEY` | required with endpoint         |
    /// | `STORAGE_BUCKET`            | `instagram_profile_pictures`   |
    /// | `STORAGE_PUBLIC_URL`        | derived from endpoint          |
    /// | `MIRROR_PROFILE_PICTURES`   | `true`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", get("PORT"), 3000u16)?;

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && s != "*")
                    .collect()
            })
            .unwrap_or_default();
        for origin in &cors_origins {
            if let Err(e) = HeaderValue::from_str(origin) {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let database_url = require("DATABASE_URL")?;
        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            5u32,
        )?;

        let provider = ProviderConfig {
            base_url: get("HIKERAPI_BASE_URL").unwrap_or_else(|| DEFAULT_PROVIDER_URL.into()),
            access_key: require("HIKERAPI_KEY")?,
        };

        let ttl_days = parse_or("CACHE_TTL_DAYS", get("CACHE_TTL_DAYS"), DEFAULT_CACHE_TTL_DAYS)?;
        if ttl_days < 0 {
            return Err(ConfigError::Invalid {
                var: "CACHE_TTL_DAYS",
                value: ttl_days.to_string(),
                reason: "must not be negative".into(),
            });
        }
        let cache_policy =
            CachePolicy::from_days(ttl_days).ok_or_else(|| ConfigError::Invalid {
                var: "CACHE_TTL_DAYS",
                value: ttl_days.to_string(),
                reason: "too large".into(),
            })?;

        let storage = match get("STORAGE_ENDPOINT") {
            Some(endpoint) => Some(S3Settings {
                region: get("STORAGE_REGION").unwrap_or_else(|| "us-east-1".into()),
                access_key_id: require("STORAGE_ACCESS_KEY_ID")?,
                secret_access_key: require("STORAGE_SECRET_ACCESS_KEY")?,
                bucket: get("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.into()),
                public_url: get("STORAGE_PUBLIC_URL")
                    .unwrap_or_else(|| default_public_url(&endpoint)),
                endpoint,
            }),
            None => None,
        };

        let mirror_profile_pictures = match get("MIRROR_PROFILE_PICTURES") {
            Some(raw) => parse_bool("MIRROR_PROFILE_PICTURES", &raw)?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            database_url,
            database_max_connections,
            provider,
            cache_policy,
            storage,
            mirror_profile_pictures,
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}
