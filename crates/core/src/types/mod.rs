//! Core types for the draft order lookup.
//!
//! This module provides type-safe wrappers for the request inputs and the
//! JSON envelope returned to callers.

pub mod customer_id;
pub mod lookup;
pub mod search;
pub mod shop;

pub use customer_id::{CustomerId, CustomerIdError};
pub use lookup::LookupResponse;
pub use search::DraftOrderSearchQuery;
pub use shop::{ShopDomain, ShopDomainError};
