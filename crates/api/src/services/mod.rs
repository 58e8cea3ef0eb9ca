//! Business logic services for the API.
//!
//! # Services
//!
//! - `auth` - credential service: password digesting/verification, bearer
//!   token issuance, and the register/login flows

pub mod auth;
