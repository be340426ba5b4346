//! Utility modules.

/// Keeps provider response bodies from flooding the logs.
pub mod log_sanitizer;
