//! Shopify Admin API GraphQL client authenticated with an offline access token.

use async_trait::async_trait;
use draft_lookup_core::ShopDomain;
use graphql_client::QueryBody;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::{AdminApi, AdminApiError};

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Fallback when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Admin API GraphQL endpoint for `shop`.
///
/// Without a `base_url` override the endpoint is
/// `https://{shop}/admin/api/{api_version}/graphql.json`; with one, the same
/// path is joined onto the override.
///
/// # Errors
///
/// Returns `url::ParseError` if the shop domain does not form a valid URL.
pub fn admin_endpoint(
    base_url: Option<&Url>,
    shop: &ShopDomain,
    api_version: &str,
) -> Result<Url, url::ParseError> {
    let path = format!("admin/api/{api_version}/graphql.json");
    match base_url {
        Some(base) => base.join(&path),
        None => Url::parse(&format!("https://{shop}/{path}")),
    }
}

/// Admin API client for a single shop.
///
/// Implements `Debug` manually to redact the access token.
pub struct HttpAdminClient {
    http: reqwest::Client,
    shop: ShopDomain,
    endpoint: Url,
    access_token: SecretString,
}

impl std::fmt::Debug for HttpAdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdminClient")
            .field("shop", &self.shop)
            .field("endpoint", &self.endpoint.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl HttpAdminClient {
    /// Create a client.
    ///
    /// # Arguments
    ///
    /// * `http` - Shared `reqwest` client (connection pool, timeout)
    /// * `shop` - Shop the token belongs to
    /// * `endpoint` - GraphQL endpoint, usually from [`admin_endpoint`]
    /// * `access_token` - Offline Admin API access token
    #[must_use]
    pub const fn new(
        http: reqwest::Client,
        shop: ShopDomain,
        endpoint: Url,
        access_token: SecretString,
    ) -> Self {
        Self {
            http,
            shop,
            endpoint,
            access_token,
        }
    }
}

#[async_trait]
impl AdminApi for HttpAdminClient {
    #[instrument(skip(self, body), fields(shop = %self.shop, operation = body.operation_name))]
    async fn graphql(&self, body: QueryBody<Value>) -> Result<Value, AdminApiError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    // Non-negative and finite; fractional seconds round up
                    let secs = secs.ceil() as u64;
                    secs
                });
            return Err(AdminApiError::RateLimited(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdminApiError::Unauthorized(format!(
                "Admin API rejected the access token for {} (HTTP {})",
                self.shop,
                status.as_u16()
            )));
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Admin API returned an error status");
            return Err(AdminApiError::Status {
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        let payload: Value = serde_json::from_slice(&bytes)?;

        let errors = extract_errors(&payload);
        if !errors.is_empty() {
            return Err(AdminApiError::GraphQL {
                errors,
                response: payload,
            });
        }

        Ok(payload)
    }
}

/// Pull the `errors` member out of a response body.
///
/// Shopify normally returns a GraphQL error list, but some failures come back
/// with `errors` as a bare string or object. Those are wrapped into a single
/// error so they are never silently dropped.
fn extract_errors(payload: &Value) -> Vec<graphql_client::Error> {
    let Some(raw) = payload.get("errors") else {
        return Vec::new();
    };

    match raw {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                serde_json::from_value::<graphql_client::Error>(item.clone())
                    .unwrap_or_else(|_| message_only(item))
            })
            .collect(),
        other => vec![message_only(other)],
    }
}

fn message_only(value: &Value) -> graphql_client::Error {
    let message = value
        .as_str()
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| value.to_string());

    graphql_client::Error {
        message,
        locations: None,
        path: None,
        extensions: None,
    }
}
