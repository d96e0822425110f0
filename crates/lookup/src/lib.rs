//! Draft order lookup library.
//!
//! Serves `GET /api/draft-orders/latest-by-customer/{id}?shop=`, returning
//! the most recently updated OPEN draft order of a customer as Shopify's
//! Admin API reports it. Exposed as a library so the router can be driven
//! in-process by tests.
//!
//! # Security
//!
//! This crate holds offline Admin API access tokens (HIGH PRIVILEGE).
//! Set `INTERNAL_API_KEY` on any deployment reachable from outside the
//! private network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

#[cfg(test)]
mod testing;
