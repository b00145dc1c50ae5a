//! Dealflow Core - Shared types library.
//!
//! This crate provides the types used across all Dealflow components:
//! - `crm` - Contact, deal and activity management over the hosted record store
//! - `integration-tests` - In-memory record store and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and parsing helpers - no I/O, no HTTP
//! clients, no environment access. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, entity records, sparse patches and coercion helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
