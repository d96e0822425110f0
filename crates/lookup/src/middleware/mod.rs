//! HTTP middleware stack for the lookup service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (reuse `x-request-id` or generate one)
//!
//! API key enforcement is not a layer. Handlers take [`RequireApiKey`] as
//! their first extractor so `/health` stays open.

pub mod api_key;
pub mod request_id;

pub use api_key::{API_KEY_HEADER, RequireApiKey, constant_time_compare};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
