//! ChillRate HTTP API: client, wire types and errors.

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    interpret_response, is_truthy, measurement_records, path_segment, ApiClient, SubjectFeed,
    BASE_URL_ENV, DEFAULT_BASE_URL,
};
pub use error::ApiError;
pub use types::{display_name, AuthResponse, Credentials, PendingUser, Team, User};
