//! HTTP route handlers for the lookup service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                       - Liveness
//! GET  /health/ready                                 - Readiness (session store reachable)
//!
//! # Draft orders (x-api-key when INTERNAL_API_KEY is set)
//! GET  /api/draft-orders/latest-by-customer/{id}?shop=  - Latest OPEN draft order
//! ```

pub mod draft_orders;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the API routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/draft-orders/latest-by-customer/{id}",
            get(draft_orders::latest_by_customer),
        )
        .route(
            "/api/draft-orders/latest-by-customer",
            get(draft_orders::latest_by_customer_without_id),
        )
        .route(
            "/api/draft-orders/latest-by-customer/",
            get(draft_orders::latest_by_customer_without_id),
        )
}

/// Build the full application router with health checks, request IDs and
/// request tracing.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the session store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.resolver().check_ready().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiKeyPolicy;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::testing::{FakeAdmin, FakeResolver};

    fn state(resolver: FakeResolver) -> AppState {
        AppState::new(
            ApiKeyPolicy::from_optional(Some("k".to_string())),
            Arc::new(resolver),
        )
    }

    fn resolver() -> FakeResolver {
        FakeResolver::new("test.myshopify.com", FakeAdmin::replying(json!({})))
    }

    async fn call(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_api_key() {
        let response = call(build_router(state(resolver())), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), b"ok");
    }

    #[tokio::test]
    async fn test_readiness() {
        let response = call(build_router(state(resolver())), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(build_router(state(resolver().unready())), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = call(build_router(state(resolver())), "/api/draft-orders").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
