//! Admin API search filter for draft orders.

use core::fmt;

use super::CustomerId;

/// Search filter selecting a customer's open draft orders.
///
/// Renders as `status:open customer_id:<id>`, the Shopify search syntax
/// accepted by the `query` argument of `draftOrders`.
///
/// ```
/// use draft_lookup_core::{CustomerId, DraftOrderSearchQuery};
///
/// let id = CustomerId::parse("12345").unwrap();
/// let query = DraftOrderSearchQuery::open_for_customer(&id);
/// assert_eq!(query.to_string(), "status:open customer_id:12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOrderSearchQuery(String);

impl DraftOrderSearchQuery {
    /// Filter for OPEN draft orders belonging to `customer`.
    #[must_use]
    pub fn open_for_customer(customer: &CustomerId) -> Self {
        Self(format!("status:open customer_id:{customer}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftOrderSearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
