//! Draft order lookups against the Shopify Admin API.

use draft_lookup_core::json_path::{self, Traversal};
use draft_lookup_core::{CustomerId, DraftOrderSearchQuery, ShopDomain};
use serde_json::Value;
use tracing::instrument;

use crate::error::LookupError;
use crate::shopify::AdminClientResolver;
use crate::shopify::queries::{self, LATEST_DRAFT_ORDER_PATH};

/// Most recently updated OPEN draft order of `customer` in `shop`.
///
/// The draft order is returned exactly as Shopify sent it.
///
/// # Errors
///
/// Returns `LookupError::NotFound` if the response holds no draft order
/// (any level of `data.draftOrders.nodes[0]` absent or null, or the node
/// itself `false`, `0` or `""`), and
/// `LookupError::Upstream` if the shop cannot be resolved or the Admin API
/// call fails.
#[instrument(skip_all, fields(shop = %shop, customer_id = %customer))]
pub async fn latest_open_draft_order(
    resolver: &dyn AdminClientResolver,
    shop: &ShopDomain,
    customer: &CustomerId,
) -> Result<Value, LookupError> {
    let admin = resolver.resolve(shop).await?;

    let filter = DraftOrderSearchQuery::open_for_customer(customer);
    let response = admin.graphql(queries::latest_draft_order(&filter)).await?;

    match json_path::get(&response, &LATEST_DRAFT_ORDER_PATH) {
        Traversal::Found(draft_order) if !is_falsy_scalar(draft_order) => {
            Ok(draft_order.clone())
        }
        Traversal::Found(draft_order) => {
            tracing::debug!(node = %draft_order, "Admin API returned a falsy draft order node");
            Err(LookupError::NotFound(customer.clone()))
        }
        Traversal::Missing { depth, segment } => {
            tracing::debug!(
                path = %json_path::display(&LATEST_DRAFT_ORDER_PATH),
                depth,
                missing = %segment,
                "No open draft order in Admin API response"
            );
            Err(LookupError::NotFound(customer.clone()))
        }
    }
}

/// `false`, `0` and `""` do not count as a draft order.
fn is_falsy_scalar(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
