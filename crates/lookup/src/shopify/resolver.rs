//! Shop-to-client resolution backed by stored offline sessions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use draft_lookup_core::ShopDomain;
use tracing::instrument;
use url::Url;

use super::{AdminApi, AdminApiError, AdminClientResolver, HttpAdminClient, admin_endpoint};
use crate::db::SessionStore;

/// Resolves shops through a [`SessionStore`] and talks to Shopify over HTTP.
pub struct SessionAdminClientResolver {
    store: Arc<dyn SessionStore>,
    http: reqwest::Client,
    api_version: String,
    base_url: Option<Url>,
}

impl SessionAdminClientResolver {
    /// Create a resolver.
    ///
    /// # Arguments
    ///
    /// * `store` - Offline session store
    /// * `http` - Shared HTTP client used by every resolved shop client
    /// * `api_version` - Admin API version (e.g., 2026-01)
    /// * `base_url` - Optional override for the Admin API host
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        http: reqwest::Client,
        api_version: impl Into<String>,
        base_url: Option<Url>,
    ) -> Self {
        Self {
            store,
            http,
            api_version: api_version.into(),
            base_url,
        }
    }
}

#[async_trait]
impl AdminClientResolver for SessionAdminClientResolver {
    #[instrument(skip(self), fields(shop = %shop))]
    async fn resolve(&self, shop: &ShopDomain) -> Result<Arc<dyn AdminApi>, AdminApiError> {
        let session = self
            .store
            .offline_session(shop)
            .await?
            .ok_or_else(|| AdminApiError::SessionNotFound(shop.to_string()))?;

        if session.is_expired_at(Utc::now()) {
            return Err(AdminApiError::SessionExpired(shop.to_string()));
        }

        let endpoint = admin_endpoint(self.base_url.as_ref(), shop, &self.api_version)?;

        Ok(Arc::new(HttpAdminClient::new(
            self.http.clone(),
            shop.clone(),
            endpoint,
            session.access_token,
        )))
    }

    async fn check_ready(&self) -> Result<(), AdminApiError> {
        self.store.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use secrecy::SecretString;

    use super::*;
    use crate::db::{OfflineSession, StaticSessionStore};

    fn resolver_with(session: OfflineSession) -> SessionAdminClientResolver {
        SessionAdminClientResolver::new(
            Arc::new(StaticSessionStore::new(session)),
            reqwest::Client::new(),
            "2026-01",
            None,
        )
    }

    fn session(shop: &str, expires_at: Option<chrono::DateTime<Utc>>) -> OfflineSession {
        OfflineSession {
            shop: ShopDomain::parse(shop).unwrap(),
            access_token: SecretString::from("shpat_test"),
            scopes: vec!["read_draft_orders".to_string()],
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_resolves_known_shop() {
        let resolver = resolver_with(session("known.myshopify.com", None));
        let shop = ShopDomain::parse("known.myshopify.com").unwrap();
        assert!(resolver.resolve(&shop).await.is_ok());
        assert!(resolver.check_ready().await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_shop_is_session_not_found() {
        let resolver = resolver_with(session("known.myshopify.com", None));
        let shop = ShopDomain::parse("other.myshopify.com").unwrap();
        let err = resolver.resolve(&shop).await.err().unwrap();
        assert!(matches!(err, AdminApiError::SessionNotFound(ref s) if s == "other.myshopify.com"));
    }

    #[tokio::test]
    async fn test_expired_session() {
        let expired = Utc::now() - Duration::minutes(5);
        let resolver = resolver_with(session("known.myshopify.com", Some(expired)));
        let shop = ShopDomain::parse("known.myshopify.com").unwrap();
        let err = resolver.resolve(&shop).await.err().unwrap();
        assert!(matches!(err, AdminApiError::SessionExpired(_)));
    }

    #[tokio::test]
    async fn test_future_expiry_is_usable() {
        let later = Utc::now() + Duration::hours(1);
        let resolver = resolver_with(session("known.myshopify.com", Some(later)));
        let shop = ShopDomain::parse("known.myshopify.com").unwrap();
        assert!(resolver.resolve(&shop).await.is_ok());
    }
}
