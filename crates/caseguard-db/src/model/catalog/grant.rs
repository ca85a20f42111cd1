//! Joined view of a grant: the permission it points at, the page that owns
//! the permission, and the grant's own allow flag.

use caseguard_core::util::route::{normalize, starts_with_route_ignore_case};
use caseguard_core::util::truthy::to_bool;

use super::{Page, Permission};

/// Where a grant row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantSource {
    /// A direct `user_permission` override.
    User,
    /// A `role_permission` reached through `user_role`.
    Role(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRow {
    pub page_id: i32,
    pub permission_id: i32,
    pub route_path: String,
    pub action_key: String,
    pub is_allowed: Option<String>,
    pub source: GrantSource,
}

impl GrantRow {
    #[must_use]
    pub fn from_parts(
        page: &Page,
        permission: &Permission,
        is_allowed: Option<String>,
        source: GrantSource,
    ) -> Self {
        Self {
            page_id: page.id,
            permission_id: permission.id,
            route_path: page.route_path.clone(),
            action_key: permission.action_key.clone(),
            is_allowed,
            source,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        to_bool(self.is_allowed.as_deref())
    }

    #[must_use]
    pub fn has_action(&self, action_key: &str) -> bool {
        self.action_key.trim().eq_ignore_ascii_case(action_key.trim())
    }

    /// Returns `true` if this grant's page is the route or one of its parents.
    #[must_use]
    pub fn covers_route(&self, route: &str) -> bool {
        starts_with_route_ignore_case(route, &self.route_path)
    }

    /// Length of the normalized route path; longer means more specific.
    #[must_use]
    pub fn specificity(&self) -> usize {
        normalize(&self.route_path).len()
    }

    #[must_use]
    pub const fn role_id(&self) -> Option<i32> {
        match self.source {
            GrantSource::User => None,
            GrantSource::Role(id) => Some(id),
        }
    }
}
