use axum::http::HeaderName;
use messagely_core::policy::ListingPolicy;

use crate::auth::jwt::JwtConfig;
use crate::auth::password::DEFAULT_WORK_FACTOR;

/// Default header carrying the bearer token.
pub const DEFAULT_AUTH_HEADER: &str = "authorization";

/// Server configuration loaded from environment variables.
///
/// All fields except the signing secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres connection string. Without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Authentication and authorization settings.
    pub auth: AuthConfig,
}

/// Process-wide authentication settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing secret and expiry.
    pub jwt: JwtConfig,
    /// Argon2 time cost for new password hashes.
    pub hash_work_factor: u32,
    /// Header field carrying `Bearer <token>`.
    pub auth_header: HeaderName,
    /// Who may list another user's sent/received messages.
    pub listing_policy: ListingPolicy,
}

impl AuthConfig {
    /// Load authentication settings from environment variables.
    ///
    /// | Env Var            | Default         |
    /// |--------------------|-----------------|
    /// | `HASH_WORK_FACTOR` | `3`             |
    /// | `AUTH_HEADER`      | `authorization` |
    /// | `LISTING_POLICY`   | `owner_only`    |
    ///
    /// See [`JwtConfig::from_env`] for the token variables.
    pub fn from_env() -> Self {
        let hash_work_factor: u32 = std::env::var("HASH_WORK_FACTOR")
            .unwrap_or_else(|_| DEFAULT_WORK_FACTOR.to_string())
            .parse()
            .expect("HASH_WORK_FACTOR must be a valid u32");
        assert!(hash_work_factor >= 1, "HASH_WORK_FACTOR must be at least 1");

        let auth_header = std::env::var("AUTH_HEADER")
            .unwrap_or_else(|_| DEFAULT_AUTH_HEADER.into())
            .to_ascii_lowercase();
        let auth_header = HeaderName::try_from(auth_header)
            .expect("AUTH_HEADER must be a valid HTTP header name");

        let listing_policy = match std::env::var("LISTING_POLICY") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|e| panic!("Invalid LISTING_POLICY: {e}")),
            Err(_) => ListingPolicy::default(),
        };

        Self {
            jwt: JwtConfig::from_env(),
            hash_work_factor,
            auth_header,
            listing_policy,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            auth: AuthConfig::from_env(),
        }
    }
}
