//! Tradewinds Core - Shared types library.
//!
//! This crate provides the domain types used across all Tradewinds
//! components:
//! - `identity` - Session and seller-status resolution
//! - the dashboard surfaces that consume resolver output
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   role and account-status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
