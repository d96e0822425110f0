//! Shopify Admin API access, scoped per shop.
//!
//! # Architecture
//!
//! - [`AdminClientResolver`] turns a shop domain into an authenticated
//!   [`AdminApi`] client. The production resolver reads the shop's offline
//!   session from a [`SessionStore`](crate::db::SessionStore); tests plug in
//!   their own.
//! - [`AdminApi`] executes one GraphQL request and returns the raw response
//!   body. Callers walk the body with `draft_lookup_core::json_path`.
//! - Requests are built with `graphql_client::QueryBody`; the HTTP layer is
//!   `reqwest` directly.
//!
//! Nothing here retries. A throttled or failed call surfaces immediately as
//! an [`AdminApiError`].

mod client;
pub mod queries;
mod resolver;

use std::sync::Arc;

use async_trait::async_trait;
use draft_lookup_core::ShopDomain;
use graphql_client::QueryBody;
use serde_json::Value;
use thiserror::Error;

pub use client::{HttpAdminClient, admin_endpoint};
pub use resolver::SessionAdminClientResolver;

use crate::db::SessionStoreError;

/// Errors that can occur when resolving or calling the Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL response carried a non-empty `errors` array.
    #[error("GraphQL errors: {}", format_graphql_errors(.errors))]
    GraphQL {
        errors: Vec<graphql_client::Error>,
        /// Full response body as returned by Shopify.
        response: Value,
    },

    /// Non-success HTTP status other than 401/403/429.
    #[error("Admin API responded with HTTP {status}")]
    Status {
        status: u16,
        /// Response body, when it was JSON.
        body: Option<Value>,
    },

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Access token rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No offline session stored for the shop (not installed, or unknown).
    #[error("No offline session for shop {0}")]
    SessionNotFound(String),

    /// Stored session is past its expiry.
    #[error("Offline session for shop {0} has expired")]
    SessionExpired(String),

    /// Session store lookup failed.
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),

    /// Admin API endpoint could not be built for the shop.
    #[error("Invalid Admin API endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl AdminApiError {
    /// Upstream response payload attached to this error, if any.
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::GraphQL { response, .. } => Some(response.clone()),
            Self::Status { body, .. } => body.clone(),
            _ => None,
        }
    }
}

fn format_graphql_errors(errors: &[graphql_client::Error]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// An authenticated GraphQL transport to one shop's Admin API.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Execute a query and return the full response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, invalid
    /// JSON, or a non-empty `errors` array.
    async fn graphql(&self, body: QueryBody<Value>) -> Result<Value, AdminApiError>;
}

/// Resolves a shop domain to an authenticated Admin API client.
#[async_trait]
pub trait AdminClientResolver: Send + Sync {
    /// Build a client for `shop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop has no usable session.
    async fn resolve(&self, shop: &ShopDomain) -> Result<Arc<dyn AdminApi>, AdminApiError>;

    /// Readiness probe for whatever backs the resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unreachable.
    async fn check_ready(&self) -> Result<(), AdminApiError> {
        Ok(())
    }
}
