//! Draft Lookup Core - Shared request types.
//!
//! This crate provides the types used by the draft order lookup service
//! and its tooling:
//! - `lookup` - HTTP service proxying draft order lookups to the Shopify Admin API
//! - `cli` - Command-line tools for migrations and shop session management
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients. Every value here lives for a single request.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for request inputs and the response envelope
//! - [`json_path`] - Null-safe traversal of upstream JSON payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod json_path;
pub mod types;

pub use types::*;
