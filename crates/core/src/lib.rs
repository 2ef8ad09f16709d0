//! Farmacia Core - Shared types library.
//!
//! Common types used by the storefront binary:
//! - Newtype IDs for customer, catalog and order entities
//! - Validated email addresses
//! - Order total arithmetic over priced cart lines
//!
//! # Architecture
//!
//! This crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Anything that touches the outside world lives in the
//! storefront crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
