//! ChillRate - Coach dashboard for team-wellness monitoring
//!
//! This library holds everything behind the `chillrate` desktop binary:
//! the API client, the persisted session, and the time-series viewport
//! engine that drives the per-member relaxation chart.
//!
//! ## Module Structure
//!
//! - [`api`] - Blocking HTTP client and wire types for the ChillRate API
//! - [`app`] - Main application state and eframe::App implementation
//! - [`poller`] - Cancellable background refresh of a member's measurements
//! - [`session`] - Persisted token/user and the auth broadcast
//! - [`settings`] - User settings persistence
//! - [`state`] - Per-screen state types and constants
//! - [`viewport`] - Normalization, windowing, sampling, selection and export
//! - [`ui`] - User interface components
//!   - `header` - Top bar and navigation
//!   - `main_page` - Teams, join requests, invite link
//!   - `team_page` - Member table
//!   - `user_detail` - Interactive relaxation chart
//!   - `toast` - Toast notification system

pub mod api;
pub mod app;
pub mod poller;
pub mod session;
pub mod settings;
pub mod state;
pub mod ui;
pub mod viewport;
