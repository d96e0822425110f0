//! Draft order lookup route handlers.
//!
//! Checks run in a fixed order: API key, `shop` query parameter, then the
//! customer ID. The first failure decides the response.

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::PathRejection},
};
use draft_lookup_core::{CustomerId, LookupResponse, ShopDomain};
use tracing::{Span, instrument};

use crate::error::LookupError;
use crate::middleware::RequireApiKey;
use crate::services;
use crate::state::AppState;

/// Latest OPEN draft order for a customer.
///
/// `GET /api/draft-orders/latest-by-customer/{id}?shop={shop}`
///
/// A segment that does not decode to UTF-8 is treated as an empty ID so the
/// `shop` check still runs first.
#[instrument(skip_all, fields(customer_id = tracing::field::Empty))]
pub async fn latest_by_customer(
    _: RequireApiKey,
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Result<Json<LookupResponse>, LookupError> {
    let id = match id {
        Ok(Path(id)) => {
            Span::current().record("customer_id", id.as_str());
            Some(id)
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable customer ID segment");
            None
        }
    };

    lookup(&state, query.as_deref(), id.as_deref()).await
}

/// Same route with the `id` segment left empty.
///
/// Always ends in 400 (or 401) since there is no customer to look up.
pub async fn latest_by_customer_without_id(
    _: RequireApiKey,
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<LookupResponse>, LookupError> {
    lookup(&state, query.as_deref(), None).await
}

async fn lookup(
    state: &AppState,
    query: Option<&str>,
    id: Option<&str>,
) -> Result<Json<LookupResponse>, LookupError> {
    let shop = shop_param(query).ok_or(LookupError::MissingShopParameter)?;

    let customer =
        CustomerId::parse(id.unwrap_or_default()).map_err(LookupError::InvalidCustomerId)?;

    let draft_order = services::latest_open_draft_order(state.resolver(), &shop, &customer).await?;

    Ok(Json(LookupResponse::found(draft_order)))
}

/// First `shop` value in the query string, if present and non-empty.
fn shop_param(query: Option<&str>) -> Option<ShopDomain> {
    let query = query?;
    let (_, value) = url::form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == "shop")?;
    ShopDomain::parse(&value).ok()
}
