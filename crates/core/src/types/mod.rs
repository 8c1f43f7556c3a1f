//! Core types for Deposit Pro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod attribute;
pub mod id;
pub mod money;
pub mod status;

pub use attribute::{CustomAttribute, find_attribute};
pub use id::*;
pub use money::{format_amount, parse_amount};
pub use status::{AssignmentMode, FinancialStatus};
