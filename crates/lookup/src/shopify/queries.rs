//! GraphQL documents sent to the Shopify Admin API.
//!
//! There is no schema-backed codegen here: the response is passed through
//! to callers untouched, so queries are plain documents wrapped in
//! `graphql_client::QueryBody`.

use draft_lookup_core::DraftOrderSearchQuery;
use draft_lookup_core::json_path::Segment;
use graphql_client::QueryBody;
use serde_json::{Value, json};

/// Operation name of [`DRAFT_ORDERS_SEARCH`].
pub const GET_DRAFT_ORDERS: &str = "GetDraftOrders";

/// Most recently updated draft order matching `$q`, with customer and up to
/// ten line items.
pub const DRAFT_ORDERS_SEARCH: &str = r"query GetDraftOrders($q: String!) {
  draftOrders(first: 1, query: $q, sortKey: UPDATED_AT, reverse: true) {
    nodes {
      id
      name
      createdAt
      updatedAt
      status
      customer { id email displayName }
      lineItems(first: 10) {
        nodes {
          id
          title
          quantity
          originalUnitPriceSet { shopMoney { amount currencyCode } }
          variant { id image { url } }
        }
      }
    }
  }
}
";

/// Location of the first draft order in a [`DRAFT_ORDERS_SEARCH`] response.
pub const LATEST_DRAFT_ORDER_PATH: [Segment<'static>; 4] = [
    Segment::Key("data"),
    Segment::Key("draftOrders"),
    Segment::Key("nodes"),
    Segment::Index(0),
];

/// Build the request body for the latest draft order matching `filter`.
#[must_use]
pub fn latest_draft_order(filter: &DraftOrderSearchQuery) -> QueryBody<Value> {
    QueryBody {
        variables: json!({ "q": filter.as_str() }),
        query: DRAFT_ORDERS_SEARCH,
        operation_name: GET_DRAFT_ORDERS,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use draft_lookup_core::CustomerId;

    use super::*;

    #[test]
    fn test_latest_draft_order_body() {
        let id = CustomerId::parse("12345").unwrap();
        let body = latest_draft_order(&DraftOrderSearchQuery::open_for_customer(&id));

        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["operationName"], "GetDraftOrders");
        assert_eq!(wire["variables"], json!({"q": "status:open customer_id:12345"}));
        assert!(
            wire["query"]
                .as_str()
                .unwrap()
                .contains("draftOrders(first: 1, query: $q, sortKey: UPDATED_AT, reverse: true)")
        );
    }

    #[test]
    fn test_query_selects_line_item_fields() {
        for field in [
            "lineItems(first: 10)",
            "originalUnitPriceSet { shopMoney { amount currencyCode } }",
            "variant { id image { url } }",
            "customer { id email displayName }",
        ] {
            assert!(DRAFT_ORDERS_SEARCH.contains(field), "missing {field}");
        }
    }
}
