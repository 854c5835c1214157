//! Integration tests for end-to-end functionality
//!
//! Tests for:
//! - Engine scenarios over whole sequences
//! - Window invariants for several sequence lengths
//! - Refresh poller scheduling, failures and cancellation

pub mod engine_scenarios_tests;
