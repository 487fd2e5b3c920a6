//! Bookstack Core - Shared types library.
//!
//! This crate provides common types used across all Bookstack components:
//! - `cart` - Cart reconciliation and pricing subsystem
//! - external collaborators (checkout, auth) that exchange these types
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, cart keys, item ids, and amounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
