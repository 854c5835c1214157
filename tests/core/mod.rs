//! Core module tests for the viewport engine building blocks
//!
//! Tests for:
//! - Measurement normalization and value coercion
//! - Viewport window operations
//! - Sampling/decimation
//! - Hover and lock selection
//! - Refresh merging
//! - CSV export
//! - Settings and session persistence

pub mod export_tests;
pub mod measurement_tests;
pub mod refresh_tests;
pub mod selection_tests;
pub mod session_tests;
pub mod viewport_tests;
