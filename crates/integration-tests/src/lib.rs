//! Integration test support for the draft order lookup service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (fake Shopify Admin API on a loopback port)
//! cargo test -p draft-lookup-integration-tests
//!
//! # Include tests that need PostgreSQL (LOOKUP_DATABASE_URL) or a live shop
//! cargo test -p draft-lookup-integration-tests -- --ignored
//! ```
//!
//! # Pieces
//!
//! - [`FakeShopify`] - Admin API stand-in that records requests and replies
//!   with a canned response
//! - [`TestApp`] - the real lookup router, configured from variables and
//!   served on a loopback port, pointed at a [`FakeShopify`]

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use draft_lookup::config::LookupConfig;
use draft_lookup::routes::build_router;
use draft_lookup::state::AppState;
use serde_json::Value;
use tokio::net::TcpListener;

/// Shop the [`TestApp`] holds a static session for.
pub const TEST_SHOP: &str = "integration-test.myshopify.com";

/// Access token the [`TestApp`] presents to Shopify.
pub const TEST_ACCESS_TOKEN: &str = "shpat_integration_test_token";

/// API version the [`TestApp`] is configured with.
pub const TEST_API_VERSION: &str = "2026-01";

/// A response [`FakeShopify`] sends for every GraphQL request.
#[derive(Debug, Clone)]
pub struct CannedReply {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl CannedReply {
    /// 200 with a JSON body.
    #[must_use]
    pub fn json(body: &Value) -> Self {
        Self::status(200, body.to_string())
    }

    /// Arbitrary status and raw body.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A GraphQL request as [`FakeShopify`] received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub api_version: String,
    pub access_token: Option<String>,
    pub body: Value,
}

/// In-process stand-in for a shop's Admin API GraphQL endpoint.
#[derive(Clone)]
pub struct FakeShopify {
    inner: Arc<FakeShopifyInner>,
    addr: SocketAddr,
}

struct FakeShopifyInner {
    reply: Mutex<CannedReply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeShopify {
    /// Start a fake answering every request with `reply`.
    pub async fn start(reply: CannedReply) -> Self {
        let inner = Arc::new(FakeShopifyInner {
            reply: Mutex::new(reply),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/admin/api/{version}/graphql.json", post(graphql))
            .with_state(Arc::clone(&inner));

        let addr = serve(app).await;
        Self { inner, addr }
    }

    /// Base URL to use as `SHOPIFY_ADMIN_BASE_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Replace the canned reply.
    pub fn reply_with(&self, reply: CannedReply) {
        *self.inner.reply.lock().expect("reply lock poisoned") = reply;
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner
            .requests
            .lock()
            .expect("requests lock poisoned")
            .clone()
    }
}

async fn graphql(
    State(inner): State<Arc<FakeShopifyInner>>,
    Path(version): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        api_version: version,
        access_token: headers
            .get("x-shopify-access-token")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    inner
        .requests
        .lock()
        .expect("requests lock poisoned")
        .push(recorded);

    let reply = inner.reply.lock().expect("reply lock poisoned").clone();

    let mut response_headers = HeaderMap::new();
    response_headers.insert("content-type", HeaderValue::from_static("application/json"));
    for (name, value) in &reply.headers {
        response_headers.insert(
            HeaderName::try_from(name.as_str()).expect("invalid header name"),
            HeaderValue::try_from(value.as_str()).expect("invalid header value"),
        );
    }

    let status = StatusCode::from_u16(reply.status).expect("invalid status");
    (status, response_headers, reply.body).into_response()
}

/// The lookup service served on a loopback port.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the service with a static session for [`TEST_SHOP`], talking to
    /// `shopify`. `api_key` becomes `INTERNAL_API_KEY`.
    pub async fn start(shopify: &FakeShopify, api_key: Option<&str>) -> Self {
        let mut vars = HashMap::from([
            ("SHOPIFY_STORE".to_string(), TEST_SHOP.to_string()),
            (
                "SHOPIFY_ADMIN_ACCESS_TOKEN".to_string(),
                TEST_ACCESS_TOKEN.to_string(),
            ),
            ("SHOPIFY_ADMIN_BASE_URL".to_string(), shopify.base_url()),
            ("SHOPIFY_API_VERSION".to_string(), TEST_API_VERSION.to_string()),
            ("SHOPIFY_HTTP_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        if let Some(key) = api_key {
            vars.insert("INTERNAL_API_KEY".to_string(), key.to_string());
        }

        let lookup = |key: &str| vars.get(key).cloned();
        let config = LookupConfig::from_vars(&lookup).expect("invalid test configuration");
        let state = AppState::from_config(&config)
            .await
            .expect("failed to build application state");

        let addr = serve(build_router(state)).await;

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    /// `GET` a path, optionally with an `x-api-key` header.
    pub async fn get(&self, path: &str, api_key: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(format!("{}{path}", self.base_url));
        if let Some(key) = api_key {
            request = request.header("x-api-key", key);
        }
        request.send().await.expect("request to lookup service failed")
    }

    /// `GET` the latest-by-customer route for `id` in [`TEST_SHOP`].
    pub async fn latest_by_customer(&self, id: &str, api_key: Option<&str>) -> reqwest::Response {
        self.get(
            &format!("/api/draft-orders/latest-by-customer/{id}?shop={TEST_SHOP}"),
            api_key,
        )
        .await
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind loopback port");
    let addr = listener.local_addr().expect("listener has no local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    addr
}
