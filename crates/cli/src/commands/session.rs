//! Offline shop session management commands.
//!
//! # Usage
//!
//! ```bash
//! dl-cli session set -s my-store.myshopify.com -t shpat_xxx --scopes read_draft_orders
//! dl-cli session remove -s my-store.myshopify.com
//! dl-cli session list
//! ```
//!
//! # Environment Variables
//!
//! - `LOOKUP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Default for `--token`

use chrono::{DateTime, Utc};
use draft_lookup::db::{SessionRepository, SessionStoreError, SessionSummary, create_pool};
use draft_lookup_core::{ShopDomain, ShopDomainError};
use sqlx::PgPool;
use thiserror::Error;

use super::database_url;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing environment variable: LOOKUP_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Invalid shop: {0}")]
    InvalidShop(#[from] ShopDomainError),

    #[error("Access token must not be empty")]
    EmptyToken,

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),

    #[error("No session stored for shop: {0}")]
    NotFound(String),
}

async fn connect() -> Result<PgPool, SessionError> {
    let database_url = database_url().ok_or(SessionError::MissingDatabaseUrl)?;
    tracing::info!("Connecting to session database...");
    Ok(create_pool(&database_url).await?)
}

/// Store an offline access token for a shop, replacing any existing one.
///
/// # Errors
///
/// Returns an error if the shop or token is empty, or the database fails.
pub async fn set(
    shop: &str,
    token: &str,
    scopes: &[String],
    expires_at: Option<DateTime<Utc>>,
) -> Result<(), SessionError> {
    let shop = ShopDomain::parse(shop.trim())?;
    let token = token.trim();
    if token.is_empty() {
        return Err(SessionError::EmptyToken);
    }
    let scopes = normalize_scopes(scopes);

    if let Some(expires_at) = expires_at
        && expires_at <= Utc::now()
    {
        tracing::warn!(%expires_at, "Expiry is in the past; lookups for this shop will fail");
    }

    let pool = connect().await?;
    SessionRepository::new(&pool)
        .save(&shop, token, &scopes, expires_at)
        .await?;

    tracing::info!(shop = %shop, scopes = %scopes.join(","), "Session stored");
    Ok(())
}

/// Remove the stored session for a shop.
///
/// # Errors
///
/// Returns `SessionError::NotFound` if no session was stored for the shop.
pub async fn remove(shop: &str) -> Result<(), SessionError> {
    let shop = ShopDomain::parse(shop.trim())?;

    let pool = connect().await?;
    if !SessionRepository::new(&pool).delete(shop.as_str()).await? {
        return Err(SessionError::NotFound(shop.to_string()));
    }

    tracing::info!(shop = %shop, "Session removed");
    Ok(())
}

/// Print stored sessions. Tokens are never printed.
///
/// # Errors
///
/// Returns an error if the database fails.
pub async fn list() -> Result<(), SessionError> {
    let pool = connect().await?;
    let sessions = SessionRepository::new(&pool).list().await?;

    #[allow(clippy::print_stdout)]
    {
        if sessions.is_empty() {
            println!("No sessions stored.");
        }
        for session in &sessions {
            println!("{}", format_summary(session));
        }
    }

    Ok(())
}

fn normalize_scopes(scopes: &[String]) -> Vec<String> {
    scopes
        .iter()
        .map(|scope| scope.trim().to_string())
        .filter(|scope| !scope.is_empty())
        .collect()
}

fn format_summary(session: &SessionSummary) -> String {
    let expires = session
        .expires_at
        .map_or_else(|| "never".to_string(), |at| at.to_rfc3339());
    let scopes = if session.scopes.is_empty() {
        "-".to_string()
    } else {
        session.scopes.join(",")
    };

    format!(
        "{}\tscopes={}\texpires={}\tupdated={}",
        session.shop,
        scopes,
        expires,
        session.updated_at.to_rfc3339()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_normalize_scopes() {
        let scopes = vec![
            " read_draft_orders".to_string(),
            String::new(),
            "read_customers ".to_string(),
        ];
        assert_eq!(
            normalize_scopes(&scopes),
            vec!["read_draft_orders", "read_customers"]
        );
    }

    #[test]
    fn test_format_summary() {
        let updated = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let summary = SessionSummary {
            shop: "a.myshopify.com".to_string(),
            scopes: vec!["read_draft_orders".to_string()],
            expires_at: None,
            updated_at: updated,
        };
        assert_eq!(
            format_summary(&summary),
            "a.myshopify.com\tscopes=read_draft_orders\texpires=never\tupdated=2026-03-01T12:00:00+00:00"
        );

        let bare = SessionSummary {
            scopes: Vec::new(),
            expires_at: Some(updated),
            ..summary
        };
        assert!(format_summary(&bare).contains("scopes=-\texpires=2026-03-01T12:00:00+00:00"));
    }

    #[tokio::test]
    async fn test_set_rejects_empty_input_before_connecting() {
        assert!(matches!(
            set("  ", "shpat_x", &[], None).await,
            Err(SessionError::InvalidShop(_))
        ));
        assert!(matches!(
            set("a.myshopify.com", " ", &[], None).await,
            Err(SessionError::EmptyToken)
        ));
    }
}
