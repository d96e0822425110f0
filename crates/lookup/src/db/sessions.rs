//! Offline session repository and store implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use draft_lookup_core::ShopDomain;
use secrecy::SecretString;
use sqlx::PgPool;

use super::{SessionStore, SessionStoreError};

// =============================================================================
// Types
// =============================================================================

/// An offline Admin API session for one shop.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct OfflineSession {
    /// Shop domain (e.g., your-store.myshopify.com).
    pub shop: ShopDomain,
    /// Admin API access token (HIGH PRIVILEGE - redacted in debug output).
    pub access_token: SecretString,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Expiry, for tokens that have one. Offline tokens usually don't.
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for OfflineSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineSession")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl OfflineSession {
    /// Returns `true` if the session has an expiry at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Session metadata without the token, for listings.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub shop: String,
    pub scopes: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    shop: String,
    access_token: String,
    scope: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionSummaryRow {
    shop: String,
    scope: String,
    expires_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

fn split_scopes(scope: &str) -> Vec<String> {
    scope
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl TryFrom<SessionRow> for OfflineSession {
    type Error = SessionStoreError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let shop = ShopDomain::parse(&row.shop)
            .map_err(|e| SessionStoreError::DataCorruption(format!("session shop: {e}")))?;

        Ok(Self {
            shop,
            access_token: SecretString::from(row.access_token),
            scopes: split_scopes(&row.scope),
            expires_at: row.expires_at,
        })
    }
}

impl From<SessionSummaryRow> for SessionSummary {
    fn from(row: SessionSummaryRow) -> Self {
        Self {
            scopes: split_scopes(&row.scope),
            shop: row.shop,
            expires_at: row.expires_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for offline session database operations.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the session for a shop.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Database` if the query fails, or
    /// `SessionStoreError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_shop(&self, shop: &str) -> Result<Option<OfflineSession>, SessionStoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            SELECT shop, access_token, scope, expires_at
            FROM lookup.shopify_session
            WHERE shop = $1
            ",
        )
        .bind(shop)
        .fetch_optional(self.pool)
        .await?;

        row.map(OfflineSession::try_from).transpose()
    }

    /// Save or update the session for a shop.
    ///
    /// Uses upsert to handle both new and existing sessions.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Database` if the query fails.
    pub async fn save(
        &self,
        shop: &ShopDomain,
        access_token: &str,
        scopes: &[String],
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), SessionStoreError> {
        let scope = scopes.join(",");

        sqlx::query(
            r"
            INSERT INTO lookup.shopify_session (shop, access_token, scope, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(shop) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                scope = EXCLUDED.scope,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
            ",
        )
        .bind(shop.as_str())
        .bind(access_token)
        .bind(scope)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete the session for a shop.
    ///
    /// Returns `true` if a session was removed.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Database` if the query fails.
    pub async fn delete(&self, shop: &str) -> Result<bool, SessionStoreError> {
        let result = sqlx::query("DELETE FROM lookup.shopify_session WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List stored sessions without their tokens, ordered by shop.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SessionSummary>, SessionStoreError> {
        let rows = sqlx::query_as::<_, SessionSummaryRow>(
            r"
            SELECT shop, scope, expires_at, updated_at
            FROM lookup.shopify_session
            ORDER BY shop
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(SessionSummary::from).collect())
    }
}

// =============================================================================
// Stores
// =============================================================================

/// Session store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn offline_session(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<OfflineSession>, SessionStoreError> {
        SessionRepository::new(&self.pool)
            .get_by_shop(shop.as_str())
            .await
    }

    async fn ping(&self) -> Result<(), SessionStoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Session store holding a single, fixed session.
///
/// Used for single-shop deployments configured entirely from the environment.
#[derive(Debug, Clone)]
pub struct StaticSessionStore {
    session: OfflineSession,
}

impl StaticSessionStore {
    #[must_use]
    pub const fn new(session: OfflineSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionStore for StaticSessionStore {
    async fn offline_session(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<OfflineSession>, SessionStoreError> {
        Ok((self.session.shop == *shop).then(|| self.session.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn session(expires_at: Option<DateTime<Utc>>) -> OfflineSession {
        OfflineSession {
            shop: ShopDomain::parse("test.myshopify.com").unwrap(),
            access_token: SecretString::from("shpat_super_secret_token"),
            scopes: vec!["read_draft_orders".to_string()],
            expires_at,
        }
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        assert!(!session(None).is_expired_at(now));
        assert!(!session(Some(now + Duration::seconds(1))).is_expired_at(now));
        assert!(session(Some(now)).is_expired_at(now));
        assert!(session(Some(now - Duration::days(1))).is_expired_at(now));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug_output = format!("{:?}", session(None));
        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_super_secret_token"));
    }

    #[test]
    fn test_row_conversion_splits_scopes() {
        let row = SessionRow {
            shop: "test.myshopify.com".to_string(),
            access_token: "shpat_x".to_string(),
            scope: "read_draft_orders, read_customers,,".to_string(),
            expires_at: None,
        };
        let session = OfflineSession::try_from(row).unwrap();
        assert_eq!(session.scopes, vec!["read_draft_orders", "read_customers"]);
    }

    #[test]
    fn test_row_conversion_rejects_empty_shop() {
        let row = SessionRow {
            shop: String::new(),
            access_token: "shpat_x".to_string(),
            scope: String::new(),
            expires_at: None,
        };
        assert!(matches!(
            OfflineSession::try_from(row),
            Err(SessionStoreError::DataCorruption(_))
        ));
    }

    #[tokio::test]
    async fn test_static_store_matches_shop_only() {
        let store = StaticSessionStore::new(session(None));

        let known = ShopDomain::parse("test.myshopify.com").unwrap();
        let other = ShopDomain::parse("other.myshopify.com").unwrap();

        assert!(store.offline_session(&known).await.unwrap().is_some());
        assert!(store.offline_session(&other).await.unwrap().is_none());
        assert!(store.ping().await.is_ok());
    }
}
