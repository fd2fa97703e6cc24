//! Settings loaded from environment variables.
//!
//! Every value has a development default except where noted; a variable
//! that is present but malformed is an [`AppError::ImproperlyConfigured`].

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Secret used when `DJANGO_SECRET_KEY` is not provided. Development only.
pub const INSECURE_SECRET_KEY: &str =
    "insecure--zs(!*1q))g1q#jaxtzqyzd6pqz!9b7-_!9o9c)-2g52pd%+h@";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://db.sqlite3?mode=rwc";
pub const DEFAULT_CONN_MAX_AGE_SECS: u64 = 600;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_FILE_STORAGE: &str = "filesystem";
pub const DEFAULT_EMAIL_BACKEND: &str = "smtp";

/// Where settings read raw values from.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

fn missing(var: &str) -> AppError {
    AppError::improperly_configured(format!("{} environment variable must be set.", var))
}

/// Read a string variable, falling back to `default`.
pub fn env_var<S: EnvSource + ?Sized>(source: &S, var: &str, default: Option<&str>) -> AppResult<String> {
    match source.get(var) {
        Some(value) => Ok(value),
        None => default.map(str::to_string).ok_or_else(|| missing(var)),
    }
}

/// Read a boolean variable: `true` and `1` (any case) are true, anything else is false.
pub fn env_bool<S: EnvSource + ?Sized>(source: &S, var: &str, default: Option<bool>) -> AppResult<bool> {
    match source.get(var) {
        Some(value) => Ok(matches!(value.to_lowercase().as_str(), "true" | "1")),
        None => default.ok_or_else(|| missing(var)),
    }
}

/// Read an integer variable.
pub fn env_int<S: EnvSource + ?Sized>(source: &S, var: &str, default: Option<i64>) -> AppResult<i64> {
    match source.get(var) {
        Some(value) => value.trim().parse().map_err(|_| {
            AppError::improperly_configured(format!("{} must be an integer, got {:?}.", var, value))
        }),
        None => default.ok_or_else(|| missing(var)),
    }
}

/// Read a comma-separated list. Blank items are dropped.
pub fn env_list<S: EnvSource + ?Sized>(
    source: &S,
    var: &str,
    default: Option<Vec<String>>,
) -> AppResult<Vec<String>> {
    match source.get(var) {
        Some(value) => Ok(value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()),
        None => default.ok_or_else(|| missing(var)),
    }
}

/// Read a two-element tuple written as `(a, b)` or `a,b`. A missing variable is `None`.
pub fn env_tuple<S: EnvSource + ?Sized>(source: &S, var: &str) -> AppResult<Option<(String, String)>> {
    let Some(value) = source.get(var) else {
        return Ok(None);
    };

    let inner = value
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let items: Vec<&str> = inner.split(',').map(str::trim).collect();

    match items.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => {
            Ok(Some((first.to_string(), second.to_string())))
        }
        _ => Err(AppError::improperly_configured(format!(
            "{} must be a pair like \"(HEADER, value)\", got {:?}.",
            var, value
        ))),
    }
}

/// Database connection settings.
#[derive(Clone, Serialize)]
pub struct DatabaseSettings {
    #[serde(skip_serializing)]
    pub url: String,
    /// Maximum lifetime of a pooled connection, in seconds
    pub conn_max_age_secs: u64,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"[REDACTED]")
            .field("conn_max_age_secs", &self.conn_max_age_secs)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn conn_max_age(&self) -> Duration {
        Duration::from_secs(self.conn_max_age_secs)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            conn_max_age_secs: DEFAULT_CONN_MAX_AGE_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Transport security switches handed to the hosting web layer.
#[derive(Debug, Clone, Serialize)]
pub struct SecuritySettings {
    pub csrf_cookie_secure: bool,
    pub session_cookie_secure: bool,
    pub hsts_include_subdomains: bool,
    pub hsts_preload: bool,
    pub hsts_seconds: i64,
    pub proxy_ssl_header: Option<(String, String)>,
    pub ssl_redirect: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            csrf_cookie_secure: true,
            session_cookie_secure: true,
            hsts_include_subdomains: true,
            hsts_preload: true,
            hsts_seconds: 0,
            proxy_ssl_header: None,
            ssl_redirect: true,
        }
    }
}

/// Application settings
#[derive(Clone, Serialize)]
pub struct Settings {
    #[serde(skip_serializing)]
    secret_key: String,
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub internal_ips: Vec<String>,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub default_file_storage: String,
    pub default_from_email: String,
    pub email_backend: String,
    pub media_root: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("secret_key", &"[REDACTED]")
            .field("debug", &self.debug)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("internal_ips", &self.internal_ips)
            .field("database", &self.database)
            .field("security", &self.security)
            .field("default_file_storage", &self.default_file_storage)
            .field("default_from_email", &self.default_from_email)
            .field("email_backend", &self.email_backend)
            .field("media_root", &self.media_root)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::load(&ProcessEnv)
    }

    /// Load settings from any source of variables.
    pub fn load<S: EnvSource + ?Sized>(env: &S) -> AppResult<Self> {
        let secret_key = env_var(env, "DJANGO_SECRET_KEY", Some(INSECURE_SECRET_KEY))?;
        let debug = env_bool(env, "DJANGO_DEBUG", Some(false))?;

        let database = DatabaseSettings {
            url: env_var(env, "DATABASE_URL", Some(DEFAULT_DATABASE_URL))?,
            conn_max_age_secs: non_negative(
                "DATABASE_CONN_MAX_AGE",
                env_int(env, "DATABASE_CONN_MAX_AGE", Some(DEFAULT_CONN_MAX_AGE_SECS as i64))?,
            )?,
            max_connections: non_negative(
                "DATABASE_MAX_CONNECTIONS",
                env_int(env, "DATABASE_MAX_CONNECTIONS", Some(DEFAULT_MAX_CONNECTIONS as i64))?,
            )?,
        };

        let security = SecuritySettings {
            csrf_cookie_secure: env_bool(env, "DJANGO_CSRF_COOKIE_SECURE", Some(true))?,
            session_cookie_secure: env_bool(env, "DJANGO_SESSION_COOKIE_SECURE", Some(true))?,
            hsts_include_subdomains: env_bool(env, "DJANGO_SECURE_HSTS_INCLUDE_SUBDOMAINS", Some(true))?,
            hsts_preload: env_bool(env, "DJANGO_SECURE_HSTS_PRELOAD", Some(true))?,
            hsts_seconds: env_int(env, "DJANGO_SECURE_HSTS_SECONDS", Some(0))?,
            proxy_ssl_header: env_tuple(env, "DJANGO_SECURE_PROXY_SSL_HEADER")?,
            ssl_redirect: env_bool(env, "DJANGO_SECURE_SSL_REDIRECT", Some(true))?,
        };

        Ok(Self {
            secret_key,
            debug,
            allowed_hosts: env_list(env, "DJANGO_ALLOWED_HOSTS", Some(Vec::new()))?,
            internal_ips: env_list(env, "DJANGO_INTERNAL_IPS", Some(Vec::new()))?,
            database,
            security,
            default_file_storage: env_var(env, "DJANGO_DEFAULT_FILE_STORAGE", Some(DEFAULT_FILE_STORAGE))?,
            default_from_email: env_var(env, "DJANGO_DEFAULT_FROM_EMAIL", Some(""))?,
            email_backend: env_var(env, "DJANGO_EMAIL_BACKEND", Some(DEFAULT_EMAIL_BACKEND))?,
            media_root: env_var(env, "DJANGO_MEDIA_ROOT", Some(""))?,
        })
    }

    /// Secret key bytes for signing.
    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// Whether the development secret key is in use.
    pub fn uses_insecure_secret_key(&self) -> bool {
        self.secret_key == INSECURE_SECRET_KEY
    }

    /// Default tracing filter: verbose while debugging.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn non_negative<T: TryFrom<i64>>(var: &str, value: i64) -> AppResult<T> {
    T::try_from(value).map_err(|_| {
        AppError::improperly_configured(format!("{} must be a non-negative integer.", var))
    })
}
