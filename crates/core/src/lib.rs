//! Bazaar Core - Shared types library.
//!
//! Types used by every Bazaar component:
//! - `server` - HTTP API for carts, orders and products
//! - `cli` - Migrations, user management and seeding
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Enabling the `postgres` feature adds `sqlx` encoding for each type.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
