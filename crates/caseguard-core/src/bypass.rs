//! Routes exempt from permission evaluation.
//!
//! Authentication is still required upstream; a bypassed route is simply
//! allowed without consulting the catalog. Enforcement uses the exact-match
//! [`BypassRegistry::is_bypassed`]. [`BypassRegistry::is_bypassed_prefix`]
//! is a separate helper and is not wired into enforcement.

use crate::error::{CoreError, CoreResult};
use crate::util::route::{normalize, starts_with_route};

/// Built-in bypass list: landing and self-service pages every signed-in user reaches.
pub const DEFAULT_BYPASS_ROUTES: &[&str] = &[
    "/dashboard",
    "/dashboard/profile",
    "/dashboard/change-password",
    "/dashboard/unauthorized",
    "/api/auth/session",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassRegistry {
    routes: Vec<String>,
}

impl BypassRegistry {
    /// ## Summary
    /// Builds a registry from route strings, normalizing each entry.
    ///
    /// ## Errors
    /// Returns `ConfigError` if an entry normalizes to the empty string.
    pub fn new<S: AsRef<str>>(routes: impl IntoIterator<Item = S>) -> CoreResult<Self> {
        let routes = routes
            .into_iter()
            .map(|route| {
                let normalized = normalize(route.as_ref());
                if normalized.is_empty() {
                    Err(CoreError::ConfigError(format!(
                        "bypass route {:?} is empty after normalization",
                        route.as_ref()
                    )))
                } else {
                    Ok(normalized)
                }
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self { routes })
    }

    /// Exact match of the normalized route against the list.
    #[must_use]
    pub fn is_bypassed(&self, route: &str) -> bool {
        let route = normalize(route);
        self.routes.iter().any(|entry| *entry == route)
    }

    /// Returns `true` if the route is a listed route or lies below one.
    #[must_use]
    pub fn is_bypassed_prefix(&self, route: &str) -> bool {
        self.routes
            .iter()
            .any(|entry| starts_with_route(route, entry))
    }

    #[must_use]
    pub fn routes(&self) -> &[String] {
        &self.routes
    }
}

impl Default for BypassRegistry {
    fn default() -> Self {
        Self {
            routes: DEFAULT_BYPASS_ROUTES.iter().copied().map(normalize).collect(),
        }
    }
}
