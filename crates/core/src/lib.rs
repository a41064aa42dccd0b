//! Polished Core - Shared types library.
//!
//! This crate provides common types used across all Polished components:
//! - `storefront` - Cart, favorites and checkout stores plus the HTTP server
//! - `cli` - Command-line access to the catalog, cart and favorites
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, phone numbers and statuses
//! - [`format`] - Display helpers for currency amounts, dates and text

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod types;

pub use types::*;
