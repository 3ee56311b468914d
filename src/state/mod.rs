//! Shared process-wide state.

pub mod auth;

pub use auth::{AuthSession, AuthStore, SessionWatch, Ticket};
