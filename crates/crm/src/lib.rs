//! Dealflow CRM library.
//!
//! Contacts, deals and activities kept in a hosted record store, exposed as
//! a JSON API. The binary in `main.rs` only wires configuration, logging and
//! the server loop around what this crate provides.
//!
//! # Layers
//!
//! - [`records`] - HTTP client for the record store and its envelope types
//! - [`services`] - typed CRUD per table, with explicit read-failure policies
//! - [`form`] - deal form state, validation and submission
//! - [`routes`] - axum handlers over [`state::AppState`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod form;
pub mod records;
pub mod routes;
pub mod services;
pub mod state;
