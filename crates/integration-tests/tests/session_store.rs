//! Integration tests for the `PostgreSQL` offline session store.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `LOOKUP_DATABASE_URL` pointing at it (migrations are applied by the test)
//!
//! Run with: cargo test -p draft-lookup-integration-tests -- --ignored

use chrono::{Duration, Utc};
use draft_lookup::db::{PgSessionStore, SessionRepository, SessionStore, create_pool};
use draft_lookup::shopify::{AdminApiError, AdminClientResolver, SessionAdminClientResolver};
use draft_lookup_core::ShopDomain;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use std::sync::Arc;

async fn pool() -> PgPool {
    let url = std::env::var("LOOKUP_DATABASE_URL").expect("LOOKUP_DATABASE_URL must be set");
    let pool = create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to session database");

    sqlx::migrate!("../lookup/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn unique_shop(tag: &str) -> ShopDomain {
    let suffix = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    ShopDomain::parse(&format!("it-{tag}-{suffix}.myshopify.com")).expect("valid shop")
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LOOKUP_DATABASE_URL)"]
async fn test_save_get_list_delete() {
    let pool = pool().await;
    let repo = SessionRepository::new(&pool);
    let shop = unique_shop("crud");

    let scopes = vec!["read_draft_orders".to_string(), "read_customers".to_string()];
    repo.save(&shop, "shpat_first", &scopes, None)
        .await
        .expect("save failed");

    let session = repo
        .get_by_shop(shop.as_str())
        .await
        .expect("get failed")
        .expect("session missing");
    assert_eq!(session.shop, shop);
    assert_eq!(session.access_token.expose_secret(), "shpat_first");
    assert_eq!(session.scopes, scopes);
    assert!(session.expires_at.is_none());

    // Upsert replaces the token
    repo.save(&shop, "shpat_second", &[], None)
        .await
        .expect("upsert failed");
    let session = repo
        .get_by_shop(shop.as_str())
        .await
        .expect("get failed")
        .expect("session missing");
    assert_eq!(session.access_token.expose_secret(), "shpat_second");
    assert!(session.scopes.is_empty());

    let listed = repo.list().await.expect("list failed");
    assert!(listed.iter().any(|s| s.shop == shop.as_str()));

    assert!(repo.delete(shop.as_str()).await.expect("delete failed"));
    assert!(!repo.delete(shop.as_str()).await.expect("delete failed"));
    assert!(
        repo.get_by_shop(shop.as_str())
            .await
            .expect("get failed")
            .is_none()
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LOOKUP_DATABASE_URL)"]
async fn test_resolver_over_postgres_store() {
    let pool = pool().await;
    let repo = SessionRepository::new(&pool);

    let live = unique_shop("live");
    let expired = unique_shop("expired");
    repo.save(&live, "shpat_live", &[], Some(Utc::now() + Duration::hours(1)))
        .await
        .expect("save failed");
    repo.save(&expired, "shpat_old", &[], Some(Utc::now() - Duration::hours(1)))
        .await
        .expect("save failed");

    let store = PgSessionStore::new(pool.clone());
    store.ping().await.expect("ping failed");

    let resolver =
        SessionAdminClientResolver::new(Arc::new(store), reqwest::Client::new(), "2026-01", None);

    assert!(resolver.resolve(&live).await.is_ok());
    assert!(matches!(
        resolver.resolve(&expired).await,
        Err(AdminApiError::SessionExpired(_))
    ));
    assert!(matches!(
        resolver.resolve(&unique_shop("missing")).await,
        Err(AdminApiError::SessionNotFound(_))
    ));
    assert!(resolver.check_ready().await.is_ok());

    repo.delete(live.as_str()).await.expect("cleanup failed");
    repo.delete(expired.as_str()).await.expect("cleanup failed");
}
