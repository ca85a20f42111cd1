//! Outcome of a route permission check.

use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

/// The catalog row that satisfied a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantMatch {
    pub page_id: i32,
    pub permission_id: i32,
    pub route_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
}

/// Why access was allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "grant", rename_all = "snake_case")]
pub enum Grant {
    Bypassed,
    EnforcementDisabled,
    SuperAdmin,
    UserOverride(GrantMatch),
    RoleGrant(GrantMatch),
}

impl Grant {
    #[must_use]
    pub const fn matched(&self) -> Option<&GrantMatch> {
        match self {
            Self::UserOverride(m) | Self::RoleGrant(m) => Some(m),
            Self::Bypassed | Self::EnforcementDisabled | Self::SuperAdmin => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No usable override or role grant covers the route and action.
    NoGrant,
    /// The catalog could not be read; the check failed closed.
    StoreUnavailable,
}

/// Diagnostics attached to a denial. Only computed on the deny path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenyDiagnostics {
    pub message: String,
    pub reason: DenyReason,
    pub route: String,
    pub action_key: String,
    /// Page that would satisfy the request, if the combination exists.
    pub page_id: Option<i32>,
    /// Permission that would satisfy the request, if the combination exists.
    pub permission_id: Option<i32>,
    pub permission_exists_in_db: bool,
    /// Permissions the identity actually holds, via override or role.
    pub granted_permission_ids: Vec<i32>,
    pub granted_permission_count: usize,
    /// Raw override rows keyed to the identity, allowed or not.
    pub user_permission_rows: i64,
}

impl DenyDiagnostics {
    #[must_use]
    pub fn no_grant(route: String, action_key: String) -> Self {
        Self {
            message: format!("Access denied: {action_key} on {route}"),
            reason: DenyReason::NoGrant,
            route,
            action_key,
            page_id: None,
            permission_id: None,
            permission_exists_in_db: false,
            granted_permission_ids: Vec::new(),
            granted_permission_count: 0,
            user_permission_rows: 0,
        }
    }

    #[must_use]
    pub fn store_unavailable(route: String, action_key: String) -> Self {
        Self {
            message: "Access denied: permission check could not be completed".to_string(),
            reason: DenyReason::StoreUnavailable,
            ..Self::no_grant(route, action_key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum Decision {
    Allow(Grant),
    Deny(Box<DenyDiagnostics>),
}

impl Decision {
    #[must_use]
    pub fn deny(diagnostics: DenyDiagnostics) -> Self {
        Self::Deny(Box::new(diagnostics))
    }

    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Convert to a `Result`, returning `Err(ServiceError::Forbidden)` if denied.
    ///
    /// ## Errors
    ///
    /// Returns `Forbidden` carrying the diagnostics if access is denied.
    pub fn require(self) -> ServiceResult<Grant> {
        match self {
            Self::Allow(grant) => Ok(grant),
            Self::Deny(diagnostics) => Err(ServiceError::Forbidden(diagnostics)),
        }
    }
}
