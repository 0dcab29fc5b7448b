//! FixHub Core - Shared types library.
//!
//! This crate provides common types used across all FixHub components:
//! - `client` - Cart and wishlist session state layer
//! - `cli` - Command-line tools for cache inspection and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! filesystem access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
