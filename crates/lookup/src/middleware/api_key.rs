//! Internal API key extractor.
//!
//! Guards routes with the shared secret configured in `INTERNAL_API_KEY`.
//! When the policy is [`ApiKeyPolicy::Disabled`] every request passes.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{config::ApiKeyPolicy, error::LookupError};

/// The HTTP header carrying the internal API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that enforces the [`ApiKeyPolicy`] from state.
///
/// Place it first in the handler's argument list so the key is checked
/// before any other input is validated.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(_: RequireApiKey, Path(id): Path<String>) -> impl IntoResponse {
///     // only reached with a valid key (or with the check disabled)
/// }
/// ```
pub struct RequireApiKey;

impl<S> FromRequestParts<S> for RequireApiKey
where
    ApiKeyPolicy: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = LookupError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let policy = ApiKeyPolicy::from_ref(state);

        // Header names are case-insensitive; HeaderMap normalizes them.
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if policy.verify(presented) {
            Ok(Self)
        } else {
            tracing::warn!(
                header_present = presented.is_some(),
                path = %parts.uri.path(),
                "Rejected request with missing or invalid API key"
            );
            Err(LookupError::Unauthorized)
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use secrecy::SecretString;

    use super::*;

    async fn extract(policy: ApiKeyPolicy, header: Option<(&str, &str)>) -> bool {
        let mut builder = Request::builder().uri("/api/draft-orders/latest-by-customer/1");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        RequireApiKey::from_request_parts(&mut parts, &policy)
            .await
            .is_ok()
    }

    fn required(key: &str) -> ApiKeyPolicy {
        ApiKeyPolicy::Required(SecretString::from(key.to_string()))
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
        assert!(!constant_time_compare("hello", "helloo"));
    }

    #[tokio::test]
    async fn test_disabled_policy_allows_anything() {
        assert!(extract(ApiKeyPolicy::Disabled, None).await);
        assert!(extract(ApiKeyPolicy::Disabled, Some(("x-api-key", "whatever"))).await);
    }

    #[tokio::test]
    async fn test_required_policy() {
        assert!(extract(required("s3cr3t"), Some(("x-api-key", "s3cr3t"))).await);
        assert!(!extract(required("s3cr3t"), Some(("x-api-key", "nope"))).await);
        assert!(!extract(required("s3cr3t"), Some(("x-api-key", ""))).await);
        assert!(!extract(required("s3cr3t"), None).await);
    }

    #[tokio::test]
    async fn test_header_name_is_case_insensitive() {
        assert!(extract(required("s3cr3t"), Some(("X-API-Key", "s3cr3t"))).await);
        assert!(extract(required("s3cr3t"), Some(("X-Api-Key", "s3cr3t"))).await);
    }

    #[tokio::test]
    async fn test_header_value_is_case_sensitive() {
        assert!(!extract(required("s3cr3t"), Some(("x-api-key", "S3CR3T"))).await);
    }
}
