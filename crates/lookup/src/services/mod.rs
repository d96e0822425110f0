//! Business logic services for the lookup service.
//!
//! # Services
//!
//! - `draft_orders` - Latest OPEN draft order for a customer

pub mod draft_orders;

pub use draft_orders::latest_open_draft_order;
