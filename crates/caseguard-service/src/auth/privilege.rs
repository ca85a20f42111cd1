//! The two unconditional-allow predicates.
//!
//! Super Admin and Super User come from different profile tables with
//! different rules. They are kept apart on purpose and each is checked at its
//! own call site: Super Admin inside route resolution, Super User in front of
//! the administrative endpoints.

use caseguard_core::config::AuthzConfig;
use caseguard_core::identity::Identity;
use caseguard_core::util::truthy::to_bool;
use caseguard_db::model::profile::{AdminProfile, UserAccount};

use super::catalog::PermissionCatalog;
use crate::error::ServiceResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeRules {
    super_admin_role_types: Vec<String>,
    super_admin_email: Option<String>,
    super_user_username: String,
}

impl PrivilegeRules {
    #[must_use]
    pub fn from_config(config: &AuthzConfig) -> Self {
        Self {
            super_admin_role_types: config
                .super_admin
                .role_types
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            super_admin_email: config
                .super_admin
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_lowercase),
            super_user_username: config.super_user.username.trim().to_lowercase(),
        }
    }

    /// Role type is one of the accepted spellings, or the contact address is
    /// the allow-listed one. Both compared trimmed and case-insensitively.
    #[must_use]
    pub fn is_super_admin_profile(&self, profile: &AdminProfile) -> bool {
        let role_matches = profile.role_type.as_deref().is_some_and(|role_type| {
            let role_type = role_type.trim().to_lowercase();
            self.super_admin_role_types.contains(&role_type)
        });

        let email_matches = match (&self.super_admin_email, profile.email.as_deref()) {
            (Some(allowed), Some(email)) => email.trim().to_lowercase() == *allowed,
            _ => false,
        };

        role_matches || email_matches
    }

    /// Username is the administrative username, or the `is_super` flag is truthy.
    #[must_use]
    pub fn is_super_user_account(&self, account: &UserAccount) -> bool {
        let username_matches = !self.super_user_username.is_empty()
            && account
                .username
                .as_deref()
                .is_some_and(|name| name.trim().to_lowercase() == self.super_user_username);

        username_matches || to_bool(account.is_super.as_deref())
    }
}

impl Default for PrivilegeRules {
    fn default() -> Self {
        Self::from_config(&AuthzConfig::default())
    }
}

/// ## Summary
/// Looks up the identity's staff profiles and applies the Super Admin rule
/// to each; any match grants.
///
/// ## Errors
/// Returns a database error if the profile lookup fails.
#[tracing::instrument(skip(catalog, rules), fields(identity = %identity))]
pub async fn is_super_admin(
    catalog: &dyn PermissionCatalog,
    rules: &PrivilegeRules,
    identity: &Identity,
) -> ServiceResult<bool> {
    let profiles = catalog.admin_profiles(identity).await?;
    let is_super = profiles.iter().any(|p| rules.is_super_admin_profile(p));

    tracing::trace!(profile_count = profiles.len(), is_super, "Super Admin lookup");
    Ok(is_super)
}

/// ## Summary
/// Looks up the identity's application accounts and applies the Super User
/// rule to each; any match grants.
///
/// ## Errors
/// Returns a database error if the account lookup fails.
#[tracing::instrument(skip(catalog, rules), fields(identity = %identity))]
pub async fn is_super_user(
    catalog: &dyn PermissionCatalog,
    rules: &PrivilegeRules,
    identity: &Identity,
) -> ServiceResult<bool> {
    let accounts = catalog.user_accounts(identity).await?;
    let is_super = accounts.iter().any(|a| rules.is_super_user_account(a));

    tracing::trace!(account_count = accounts.len(), is_super, "Super User lookup");
    Ok(is_super)
}
