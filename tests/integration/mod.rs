//! Integration test suite for jsonapi-admin
//!
//! End-to-end checks of the library flows and the `jsonapi-admin` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `validate`, `normalize` and `plan` commands
//! - **normalize_flow**: Documents through normalization and formatters
//! - **store_flow**: Store lifecycle, concurrent fetches and side-loading

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod normalize_flow;
mod store_flow;
