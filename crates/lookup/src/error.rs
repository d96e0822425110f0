//! Unified error handling for the lookup endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use draft_lookup_core::{CustomerId, CustomerIdError, LookupResponse};
use thiserror::Error;

use crate::shopify::AdminApiError;

/// Log tag for upstream failures on the latest-by-customer route.
pub const LOOKUP_LOG_TAG: &str = "[latest-by-customer]";

/// Every way a draft order lookup can end without a result.
///
/// Display strings are the exact `error` messages callers receive.
#[derive(Debug, Error)]
pub enum LookupError {
    /// API key required but missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// `shop` query parameter missing or empty.
    #[error("Falta query param \"shop\"")]
    MissingShopParameter,

    /// `id` path parameter missing or not all digits.
    #[error("Customer ID inválido")]
    InvalidCustomerId(#[source] CustomerIdError),

    /// No OPEN draft order for the customer.
    #[error("No hay draft order OPEN para customer_id:{0}")]
    NotFound(CustomerId),

    /// Session resolution, transport, or response failure.
    #[error(transparent)]
    Upstream(#[from] AdminApiError),
}

impl LookupError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingShopParameter | Self::InvalidCustomerId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::Upstream(err) => {
                let event_id = sentry::capture_error(err);
                tracing::error!(
                    error = %err,
                    sentry_event_id = %event_id,
                    "{LOOKUP_LOG_TAG} error"
                );
                LookupResponse::upstream_failure(err.to_string(), err.details())
            }
            _ => LookupResponse::failure(self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
