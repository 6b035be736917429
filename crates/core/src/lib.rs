//! ShopRate Core - Shared types library.
//!
//! This crate provides common types used across all ShopRate components:
//! - `portal` - Customer-facing review portal with an admin area
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere, including in tests that never touch a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, ratings, roles,
//!   plus the [`authorize`](types::authorize) gate every protected operation
//!   goes through.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
