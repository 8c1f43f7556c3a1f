//! Integration tests for Deposit Pro.
//!
//! The tests under `tests/` exercise the deposit pipeline end to end at the
//! decision layer: order payloads in, decisions out. They run against the
//! pure functions in `deposit_pro_admin::deposit`, so no database or
//! network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p deposit-pro-integration-tests
//! ```
