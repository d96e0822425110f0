//! Session store migration command.
//!
//! # Usage
//!
//! ```bash
//! dl-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `LOOKUP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/lookup/migrations/`, embedded at compile time.

use draft_lookup::db::create_pool;
use thiserror::Error;

use super::database_url;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: LOOKUP_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run session store migrations.
///
/// # Errors
///
/// Returns an error if the database URL is unset, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url().ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to session database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running session store migrations...");
    sqlx::migrate!("../lookup/migrations").run(&pool).await?;

    tracing::info!("Session store migrations complete!");
    Ok(())
}
