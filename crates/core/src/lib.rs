//! Deposit Pro Core - Shared types library.
//!
//! This crate provides common types used across all Deposit Pro components:
//! - `admin` - The merchant-facing service (webhooks, gateway, persistence)
//! - `cli` - Command-line tools for migrations and token provisioning
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Custom attributes, money parsing, financial status, IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
