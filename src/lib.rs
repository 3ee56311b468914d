//! # authgate
//!
//! Identity synchronization and route guarding for an app that signs users in
//! through a third-party identity provider and keeps its own user records in a
//! backend.
//!
//! Provider session events flow through the session watcher into the user
//! resolver, which looks up the backend user and settles the auth store. The
//! navigation guard reads the store and parks every navigation until the
//! first settle, so a protected view never renders on partial auth state.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod identity;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::AuthApp;
pub use config::AuthConfig;
