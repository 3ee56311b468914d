//! Shared error conventions.
//!
//! Each concern owns its own `thiserror` enum; this trait gives all of them a
//! grepable code and a retry hint so log lines can carry both as fields.

/// Grepable error code and retryable flag for structured log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
