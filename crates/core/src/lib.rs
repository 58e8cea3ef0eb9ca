//! Paperback Core - Shared domain types.
//!
//! This crate provides common types used across the Paperback workspace:
//! - `api` - GraphQL API server for the book-review platform
//! - `integration-tests` - end-to-end tests against the GraphQL schema
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
