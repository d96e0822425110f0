//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Session source (one of)
//! - `LOOKUP_DATABASE_URL` - `PostgreSQL` connection string for the offline
//!   session store (falls back to `DATABASE_URL`)
//! - `SHOPIFY_STORE` + `SHOPIFY_ADMIN_ACCESS_TOKEN` - single-shop deployment
//!   without a database
//!
//! ## Optional
//! - `INTERNAL_API_KEY` - Shared secret expected in the `x-api-key` header.
//!   Unset or empty disables the check.
//! - `LOOKUP_HOST` - Bind address (default: 127.0.0.1)
//! - `LOOKUP_PORT` - Listen port (default: 3002)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2026-01)
//! - `SHOPIFY_ADMIN_BASE_URL` - Send every Admin API call to this base URL
//!   instead of `https://{shop}` (local proxies, fakes)
//! - `SHOPIFY_HTTP_TIMEOUT_SECS` - Admin API request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use draft_lookup_core::ShopDomain;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "2026-01";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Lookup service configuration.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared-secret check on inbound requests
    pub api_key: ApiKeyPolicy,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Where offline Admin API sessions come from
    pub sessions: SessionSource,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Whether inbound requests must present the internal API key.
///
/// `Disabled` is an explicit state, logged at startup, rather than an
/// implicit consequence of a missing variable somewhere in the handler.
#[derive(Clone)]
pub enum ApiKeyPolicy {
    /// No header check is performed.
    Disabled,
    /// `x-api-key` must equal this secret.
    Required(SecretString),
}

impl std::fmt::Debug for ApiKeyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Required(_) => f.write_str("Required([REDACTED])"),
        }
    }
}

impl ApiKeyPolicy {
    /// Build a policy from an optional secret; `None` or empty disables the check.
    #[must_use]
    pub fn from_optional(secret: Option<String>) -> Self {
        match secret {
            Some(secret) if !secret.is_empty() => Self::Required(SecretString::from(secret)),
            _ => Self::Disabled,
        }
    }

    /// Returns `true` if a key is required.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Required(_))
    }

    /// Check a presented header value against the policy.
    #[must_use]
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match self {
            Self::Disabled => true,
            Self::Required(expected) => presented.is_some_and(|value| {
                crate::middleware::api_key::constant_time_compare(expected.expose_secret(), value)
            }),
        }
    }
}

/// Shopify Admin API transport configuration.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Override for the Admin API host
    pub base_url: Option<Url>,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Source of offline Admin API sessions.
///
/// Implements `Debug` manually to redact credentials.
#[derive(Clone)]
pub enum SessionSource {
    /// Sessions stored in `PostgreSQL` (`lookup.shopify_session`).
    Database(SecretString),
    /// One shop with a fixed access token.
    Static {
        shop: ShopDomain,
        access_token: SecretString,
    },
}

impl std::fmt::Debug for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(_) => f
                .debug_tuple("Database")
                .field(&"[REDACTED]")
                .finish(),
            Self::Static { shop, .. } => f
                .debug_struct("Static")
                .field("shop", shop)
                .field("access_token", &"[REDACTED]")
                .finish(),
        }
    }
}

impl LookupConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(vars);

        let host = env
            .or_default("LOOKUP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOOKUP_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("LOOKUP_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOOKUP_PORT".to_string(), e.to_string()))?;

        let api_key = env.optional("INTERNAL_API_KEY");
        if let Some(key) = &api_key
            && let Err(e) = validate_secret_strength(key, "INTERNAL_API_KEY")
        {
            tracing::warn!("INTERNAL_API_KEY validation warning: {e}");
        }
        let api_key = ApiKeyPolicy::from_optional(api_key);

        let shopify = ShopifyConfig::from_env(&env)?;
        let sessions = SessionSource::from_env(&env)?;

        Ok(Self {
            host,
            port,
            api_key,
            shopify,
            sessions,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env
                .optional("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: env
                .optional("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let base_url = env
            .optional("SHOPIFY_ADMIN_BASE_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOPIFY_ADMIN_BASE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let timeout_secs = env
            .or_default(
                "SHOPIFY_HTTP_TIMEOUT_SECS",
                &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_version: env.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SessionSource {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        // Prefer the service-specific URL, then the generic one (set by Fly.io postgres attach)
        if let Some(url) = env
            .optional("LOOKUP_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
        {
            return Ok(Self::Database(SecretString::from(url)));
        }

        match (
            env.optional("SHOPIFY_STORE"),
            env.optional("SHOPIFY_ADMIN_ACCESS_TOKEN"),
        ) {
            (Some(store), Some(token)) => {
                let shop = ShopDomain::parse(&store).map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOPIFY_STORE".to_string(), e.to_string())
                })?;
                Ok(Self::Static {
                    shop,
                    access_token: SecretString::from(token),
                })
            }
            (None, None) => Err(ConfigError::MissingEnvVar(
                "LOOKUP_DATABASE_URL (or SHOPIFY_STORE + SHOPIFY_ADMIN_ACCESS_TOKEN)".to_string(),
            )),
            _ => Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_*".to_string(),
                "Both SHOPIFY_STORE and SHOPIFY_ADMIN_ACCESS_TOKEN must be set together"
                    .to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup that treats empty values as unset.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
