//! Offline session storage.
//!
//! # Database
//!
//! ## Tables
//!
//! - `lookup.shopify_session` - One offline Admin API access token per shop
//!
//! # Migrations
//!
//! Migrations are stored in `crates/lookup/migrations/` and run via:
//! ```bash
//! cargo run -p draft-lookup-cli -- migrate
//! ```
//!
//! The service itself only reads sessions. Writes happen through the CLI
//! (or whatever installs the app on a shop).

pub mod sessions;

use std::time::Duration;

use async_trait::async_trait;
use draft_lookup_core::ShopDomain;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use sessions::{
    OfflineSession, PgSessionStore, SessionRepository, SessionSummary, StaticSessionStore,
};

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Read access to offline Admin API sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Offline session for `shop`, if one is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    async fn offline_session(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<OfflineSession>, SessionStoreError>;

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    async fn ping(&self) -> Result<(), SessionStoreError> {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
