//! Route-scoped permission resolution.
//!
//! ## Order of evaluation
//!
//! 1. Bypassed route (exact match) -> allow
//! 2. Enforcement switch off -> allow
//! 3. Super Admin -> allow
//! 4. Action key: caller-supplied, else from the action table
//! 5. Route normalized
//! 6. Most specific allowed user override -> allow
//! 7. Most specific allowed role grant -> allow
//! 8. Deny, with diagnostics
//!
//! A failing catalog read at any step denies (fails closed); the fault is
//! logged and never surfaced to the caller. Nothing here writes, so checks
//! are idempotent and need no coordination.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

use salvo::async_trait;

use caseguard_core::action::{ActionTable, canonical_action_key};
use caseguard_core::bypass::BypassRegistry;
use caseguard_core::config::AuthzConfig;
use caseguard_core::identity::Identity;
use caseguard_core::switch::EnforcementSwitch;
use caseguard_core::util::route::{normalize, starts_with_route_ignore_case};
use caseguard_db::model::catalog::grant::GrantRow;

use super::catalog::PermissionCatalog;
use super::decision::{Decision, DenyDiagnostics, Grant, GrantMatch};
use super::privilege::{self, PrivilegeRules};
use crate::error::{ServiceError, ServiceResult};

pub struct PermissionResolver {
    catalog: Arc<dyn PermissionCatalog>,
    bypass: BypassRegistry,
    switch: EnforcementSwitch,
    actions: ActionTable,
    privileges: PrivilegeRules,
}

impl PermissionResolver {
    /// ## Summary
    /// Builds a resolver from the `authz` configuration section.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if a configured bypass route is empty.
    pub fn from_config(
        catalog: Arc<dyn PermissionCatalog>,
        config: &AuthzConfig,
    ) -> ServiceResult<Self> {
        Ok(Self {
            catalog,
            bypass: BypassRegistry::new(&config.bypass_routes)?,
            switch: EnforcementSwitch::from_config(config),
            actions: ActionTable::default(),
            privileges: PrivilegeRules::from_config(config),
        })
    }

    /// A resolver with built-in defaults and enforcement always on.
    #[must_use]
    pub fn new(catalog: Arc<dyn PermissionCatalog>) -> Self {
        Self {
            catalog,
            bypass: BypassRegistry::default(),
            switch: EnforcementSwitch::fixed(false),
            actions: ActionTable::default(),
            privileges: PrivilegeRules::default(),
        }
    }

    #[must_use]
    pub fn with_bypass(mut self, bypass: BypassRegistry) -> Self {
        self.bypass = bypass;
        self
    }

    #[must_use]
    pub fn with_switch(mut self, switch: EnforcementSwitch) -> Self {
        self.switch = switch;
        self
    }

    /// ## Summary
    /// Decides whether `identity` may perform `action_key` on `route`.
    ///
    /// Never fails: store faults are logged and turned into a denial.
    #[tracing::instrument(skip(self), fields(identity = %identity))]
    pub async fn resolve(
        &self,
        identity: &Identity,
        route: &str,
        action_key: Option<&str>,
    ) -> Decision {
        if self.bypass.is_bypassed(route) {
            tracing::debug!("Route is bypassed");
            return Decision::Allow(Grant::Bypassed);
        }

        if self.switch.is_disabled() {
            tracing::debug!("Authorization enforcement is disabled");
            return Decision::Allow(Grant::EnforcementDisabled);
        }

        match self.is_super_admin(identity).await {
            Ok(true) => {
                tracing::debug!("Super Admin granted");
                return Decision::Allow(Grant::SuperAdmin);
            }
            Ok(false) => {}
            Err(e) => return self.fail_closed(&e, route, action_key),
        }

        let action_key = self.action_key(route, action_key);
        let route = normalize(route);

        tracing::debug!(route = %route, action = %action_key, "Resolving route permission");

        let overrides = match self.catalog.user_permission_grants(identity).await {
            Ok(rows) => rows,
            Err(e) => return self.fail_closed(&ServiceError::from(e), &route, Some(&action_key)),
        };

        if let Some(grant) = most_specific_grant(&overrides, &route, &action_key) {
            tracing::debug!(
                page_id = grant.page_id,
                permission_id = grant.permission_id,
                "User override granted"
            );
            return Decision::Allow(Grant::UserOverride(grant));
        }

        let role_grants = match self.catalog.role_permission_grants(identity).await {
            Ok(rows) => rows,
            Err(e) => return self.fail_closed(&ServiceError::from(e), &route, Some(&action_key)),
        };

        if let Some(grant) = most_specific_grant(&role_grants, &route, &action_key) {
            tracing::debug!(
                page_id = grant.page_id,
                permission_id = grant.permission_id,
                role_id = ?grant.role_id,
                "Role grant granted"
            );
            return Decision::Allow(Grant::RoleGrant(grant));
        }

        let diagnostics = self
            .deny_diagnostics(identity, route, action_key, &overrides, &role_grants)
            .await;

        tracing::debug!(
            route = %diagnostics.route,
            action = %diagnostics.action_key,
            permission_exists = diagnostics.permission_exists_in_db,
            granted_count = diagnostics.granted_permission_count,
            user_permission_rows = diagnostics.user_permission_rows,
            "Authorization denied"
        );

        Decision::deny(diagnostics)
    }

    /// ## Summary
    /// Super Admin predicate for this resolver's catalog and rules.
    ///
    /// ## Errors
    /// Returns a database error if the profile lookup fails.
    pub async fn is_super_admin(&self, identity: &Identity) -> ServiceResult<bool> {
        privilege::is_super_admin(self.catalog.as_ref(), &self.privileges, identity).await
    }

    /// ## Summary
    /// Super User predicate for this resolver's catalog and rules.
    ///
    /// ## Errors
    /// Returns a database error if the account lookup fails.
    pub async fn is_super_user(&self, identity: &Identity) -> ServiceResult<bool> {
        privilege::is_super_user(self.catalog.as_ref(), &self.privileges, identity).await
    }

    /// Caller-supplied key if non-blank, otherwise from the action table.
    fn action_key(&self, route: &str, supplied: Option<&str>) -> String {
        supplied
            .and_then(canonical_action_key)
            .unwrap_or_else(|| self.actions.action_for(route))
    }

    fn fail_closed(&self, error: &ServiceError, route: &str, action_key: Option<&str>) -> Decision {
        let action_key = self.action_key(route, action_key);
        let route = normalize(route);
        tracing::error!(
            error = %error,
            route = %route,
            action = %action_key,
            "Permission check failed; denying"
        );
        Decision::deny(DenyDiagnostics::store_unavailable(route, action_key))
    }

    /// Fills in the deny diagnostics. Overrides and role grants were already
    /// loaded by the failed lookups; this adds the identity-independent
    /// existence check and the raw override row count.
    async fn deny_diagnostics(
        &self,
        identity: &Identity,
        route: String,
        action_key: String,
        overrides: &[GrantRow],
        role_grants: &[GrantRow],
    ) -> DenyDiagnostics {
        let mut diagnostics = DenyDiagnostics::no_grant(route, action_key);

        match self.catalog.active_permissions().await {
            Ok(permissions) => {
                let target = pick_most_specific(
                    permissions.iter().filter(|(page, permission)| {
                        permission.has_action(&diagnostics.action_key)
                            && starts_with_route_ignore_case(&diagnostics.route, &page.route_path)
                    }),
                    |(page, _)| normalize(&page.route_path).len(),
                    |(_, permission)| permission.id,
                );
                if let Some((page, permission)) = target {
                    diagnostics.permission_exists_in_db = true;
                    diagnostics.page_id = Some(page.id);
                    diagnostics.permission_id = Some(permission.id);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load permissions for deny diagnostics");
            }
        }

        let granted: BTreeSet<i32> = overrides
            .iter()
            .chain(role_grants)
            .filter(|row| row.is_allowed())
            .map(|row| row.permission_id)
            .collect();
        diagnostics.granted_permission_count = granted.len();
        diagnostics.granted_permission_ids = granted.into_iter().collect();

        match self.catalog.user_permission_row_count(identity).await {
            Ok(count) => diagnostics.user_permission_rows = count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to count user permission rows for deny diagnostics");
            }
        }

        diagnostics
    }
}

/// Allowed grant for the action whose page is the route or its closest parent.
fn most_specific_grant(rows: &[GrantRow], route: &str, action_key: &str) -> Option<GrantMatch> {
    let candidates = rows.iter().filter(|row| {
        row.is_allowed() && row.has_action(action_key) && row.covers_route(route)
    });

    for row in candidates.clone() {
        tracing::trace!(
            page_id = row.page_id,
            permission_id = row.permission_id,
            route_path = %row.route_path,
            "Grant candidate"
        );
    }

    pick_most_specific(candidates, |row| row.specificity(), |row| row.permission_id).map(|row| {
        GrantMatch {
            page_id: row.page_id,
            permission_id: row.permission_id,
            route_path: row.route_path.clone(),
            role_id: row.role_id(),
        }
    })
}

/// Longest route wins; among equally specific candidates the lowest id wins
/// so repeated checks pick the same row.
fn pick_most_specific<T>(
    candidates: impl Iterator<Item = T>,
    specificity: impl Fn(&T) -> usize,
    id: impl Fn(&T) -> i32,
) -> Option<T> {
    candidates.min_by_key(|candidate| (Reverse(specificity(candidate)), id(candidate)))
}

pub struct PermissionResolverHandler {
    pub resolver: Arc<PermissionResolver>,
}

#[async_trait]
impl salvo::Handler for PermissionResolverHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.resolver.clone());
    }
}

/// ## Summary
/// Retrieves the permission resolver from the depot.
///
/// ## Errors
/// Returns an error if the resolver is not found in the depot.
pub fn get_resolver_from_depot(depot: &salvo::Depot) -> ServiceResult<Arc<PermissionResolver>> {
    depot
        .obtain::<Arc<PermissionResolver>>()
        .cloned()
        .map_err(|_err| ServiceError::InvariantViolation("Permission resolver not found in depot"))
}

#[cfg(test)]
mod tests;
