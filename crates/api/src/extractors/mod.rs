//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod admin_session;
pub mod json;

pub use json::ValidatedJson;
