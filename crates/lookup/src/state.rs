//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use secrecy::SecretString;

use crate::config::{ApiKeyPolicy, LookupConfig, SessionSource};
use crate::db::{self, OfflineSession, PgSessionStore, SessionStore, StaticSessionStore};
use crate::shopify::{AdminClientResolver, SessionAdminClientResolver};

/// User agent sent on every Admin API request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to connect to session database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api_key: ApiKeyPolicy,
    resolver: Arc<dyn AdminClientResolver>,
}

impl AppState {
    /// Create state from an API key policy and a shop resolver.
    #[must_use]
    pub fn new(api_key: ApiKeyPolicy, resolver: Arc<dyn AdminClientResolver>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { api_key, resolver }),
        }
    }

    /// Build production state: shared HTTP client, session store, resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the session
    /// database is unreachable.
    pub async fn from_config(config: &LookupConfig) -> Result<Self, StateError> {
        let http = reqwest::Client::builder()
            .timeout(config.shopify.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let store: Arc<dyn SessionStore> = match &config.sessions {
            SessionSource::Database(url) => {
                let pool = db::create_pool(url).await?;
                tracing::info!("Session database pool created");
                Arc::new(PgSessionStore::new(pool))
            }
            SessionSource::Static { shop, access_token } => {
                tracing::info!(shop = %shop, "Using static session from environment");
                Arc::new(StaticSessionStore::new(static_session(shop, access_token)))
            }
        };

        let resolver = SessionAdminClientResolver::new(
            store,
            http,
            config.shopify.api_version.clone(),
            config.shopify.base_url.clone(),
        );

        Ok(Self::new(config.api_key.clone(), Arc::new(resolver)))
    }

    /// Get the inbound API key policy.
    #[must_use]
    pub fn api_key(&self) -> &ApiKeyPolicy {
        &self.inner.api_key
    }

    /// Get the shop-to-client resolver.
    #[must_use]
    pub fn resolver(&self) -> &dyn AdminClientResolver {
        self.inner.resolver.as_ref()
    }
}

impl FromRef<AppState> for ApiKeyPolicy {
    fn from_ref(state: &AppState) -> Self {
        state.inner.api_key.clone()
    }
}

fn static_session(shop: &draft_lookup_core::ShopDomain, token: &SecretString) -> OfflineSession {
    OfflineSession {
        shop: shop.clone(),
        access_token: token.clone(),
        scopes: Vec::new(),
        expires_at: None,
    }
}
