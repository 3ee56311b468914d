//! Services that move the auth session forward.
//!
//! DESIGN
//! ======
//! provider events → `watcher` → `resolver` → store; `sign_out` asks the
//! provider to end the session and lets the same pipeline settle it.

pub mod resolver;
pub mod sign_out;
pub mod watcher;

pub use resolver::{Resolution, UserResolver};
pub use sign_out::{SignOutCoordinator, SignOutError};
pub use watcher::spawn_session_watcher;
