//! Route table and navigation intents.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation (link click, URL change, redirect) becomes a
//! `RouteIntent` here and is then admitted or redirected by the
//! [`guard::NavigationGuard`]. The actual view switch belongs to the host's
//! router, reached through the `Navigator` trait.

pub mod guard;

pub use guard::{GuardDecision, NavigationGuard};

/// Host router hook used to perform a navigation.
#[async_trait::async_trait]
pub trait Navigator: Send + Sync {
    async fn push(&self, path: &str);
}

// =============================================================================
// ROUTES
// =============================================================================

/// A declared route. Segments starting with `:` match any single segment.
///
/// Paths are percent-decoded and static segments compare case-insensitively,
/// the same way the host router resolves them, so an encoded or re-cased URL
/// for a protected view still hits its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: String,
    pub requires_auth: bool,
}

impl Route {
    #[must_use]
    pub fn public(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), requires_auth: false }
    }

    #[must_use]
    pub fn protected(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), requires_auth: true }
    }

    /// Whether `path` (already stripped of query and fragment) matches.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let decoded = decode_path(path);
        let mut want = segments(&self.pattern);
        let mut have = segments(&decoded);
        loop {
            match (want.next(), have.next()) {
                (None, None) => return true,
                (Some(w), Some(h)) if w.starts_with(':') || same_segment(w, h) => {}
                _ => return false,
            }
        }
    }
}

fn decode_path(path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
}

fn same_segment(pattern: &str, segment: &str) -> bool {
    pattern.to_lowercase() == segment.to_lowercase()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip `?query` and `#fragment` from a navigation target.
#[must_use]
pub fn route_path(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

/// A pending navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIntent {
    /// Full target as requested, query string included.
    pub target: String,
    pub requires_auth: bool,
}

impl RouteIntent {
    #[must_use]
    pub fn new(target: impl Into<String>, requires_auth: bool) -> Self {
        Self { target: target.into(), requires_auth }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        route_path(&self.target)
    }
}

/// Ordered route declarations; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's routes: landing page and sign-in are public,
    /// the dashboard and individual wishlists need a signed-in user.
    #[must_use]
    pub fn standard(sign_in_route: &str, landing_route: &str) -> Self {
        Self::new()
            .with(Route::public("/"))
            .with(Route::public(sign_in_route))
            .with(Route::protected(landing_route))
            .with(Route::protected("/wishlist/:id"))
    }

    #[must_use]
    pub fn with(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    #[must_use]
    pub fn find(&self, target: &str) -> Option<&Route> {
        let path = route_path(target);
        self.routes.iter().find(|r| r.matches(path))
    }

    /// Build the intent for `target`. Undeclared paths are public.
    #[must_use]
    pub fn intent(&self, target: &str) -> RouteIntent {
        let requires_auth = self.find(target).is_some_and(|r| r.requires_auth);
        RouteIntent::new(target, requires_auth)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
