//! CLI subcommand implementations.

pub mod migrate;
pub mod session;

use secrecy::SecretString;

/// Session database URL: `LOOKUP_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// Loads `.env` first if present.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    ["LOOKUP_DATABASE_URL", "DATABASE_URL"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
}
