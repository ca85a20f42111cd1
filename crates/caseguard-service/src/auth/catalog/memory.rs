//! Catalog held in memory, for tests and local runs without a database.

use salvo::async_trait;

use caseguard_core::identity::Identity;
use caseguard_db::error::{DbError, DbResult};
use caseguard_db::model::catalog::grant::{GrantRow, GrantSource};
use caseguard_db::model::catalog::{
    Page, Permission, Role, RolePermission, UserPermission, UserRole,
};
use caseguard_db::model::profile::{AdminProfile, UserAccount};

use super::PermissionCatalog;

/// ## Summary
/// Vectors of catalog rows with the same join and filter semantics as the
/// Postgres catalog.
///
/// Built with the `with_*` methods:
///
/// ```ignore
/// let catalog = InMemoryCatalog::default()
///     .with_page(1, "/dashboard/income")
///     .with_permission(10, 1, "ADD")
///     .with_user_permission("42", 10, Some("yes"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    pub pages: Vec<Page>,
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
    pub role_permissions: Vec<RolePermission>,
    pub user_roles: Vec<UserRole>,
    pub user_permissions: Vec<UserPermission>,
    pub admin_profiles: Vec<AdminProfile>,
    pub user_accounts: Vec<UserAccount>,
    /// When set, every query fails as if the store were unreachable.
    pub unavailable: bool,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn with_page(mut self, id: i32, route_path: &str) -> Self {
        self.pages.push(Page {
            id,
            route_path: route_path.to_string(),
            page_name: route_path.to_string(),
            is_active: true,
        });
        self
    }

    #[must_use]
    pub fn with_inactive_page(mut self, id: i32, route_path: &str) -> Self {
        self = self.with_page(id, route_path);
        if let Some(page) = self.pages.last_mut() {
            page.is_active = false;
        }
        self
    }

    #[must_use]
    pub fn with_permission(mut self, id: i32, page_id: i32, action_key: &str) -> Self {
        self.permissions.push(Permission {
            id,
            page_id,
            action_key: action_key.to_string(),
            is_active: true,
        });
        self
    }

    #[must_use]
    pub fn with_inactive_permission(mut self, id: i32, page_id: i32, action_key: &str) -> Self {
        self = self.with_permission(id, page_id, action_key);
        if let Some(permission) = self.permissions.last_mut() {
            permission.is_active = false;
        }
        self
    }

    #[must_use]
    pub fn with_role(mut self, id: i32, role_name: &str, is_active: bool) -> Self {
        self.roles.push(Role {
            id,
            role_name: role_name.to_string(),
            is_active,
        });
        self
    }

    #[must_use]
    pub fn with_role_permission(
        mut self,
        role_id: i32,
        permission_id: i32,
        is_allowed: Option<&str>,
    ) -> Self {
        self.role_permissions.push(RolePermission {
            role_id,
            permission_id,
            is_allowed: is_allowed.map(ToString::to_string),
        });
        self
    }

    #[must_use]
    pub fn with_user_role(mut self, user_id: &str, role_id: i32) -> Self {
        self.user_roles.push(UserRole {
            user_id: user_id.to_string(),
            role_id,
        });
        self
    }

    #[must_use]
    pub fn with_user_permission(
        mut self,
        user_id: &str,
        permission_id: i32,
        is_allowed: Option<&str>,
    ) -> Self {
        self.user_permissions.push(UserPermission {
            user_id: user_id.to_string(),
            permission_id,
            is_allowed: is_allowed.map(ToString::to_string),
        });
        self
    }

    #[must_use]
    pub fn with_admin_profile(
        mut self,
        id: i32,
        user_ref: &str,
        email: Option<&str>,
        role_type: Option<&str>,
    ) -> Self {
        self.admin_profiles.push(AdminProfile {
            id,
            user_ref: user_ref.to_string(),
            email: email.map(ToString::to_string),
            role_type: role_type.map(ToString::to_string),
        });
        self
    }

    #[must_use]
    pub fn with_user_account(
        mut self,
        id: i32,
        user_ref: &str,
        username: Option<&str>,
        is_super: Option<&str>,
    ) -> Self {
        self.user_accounts.push(UserAccount {
            id,
            user_ref: user_ref.to_string(),
            username: username.map(ToString::to_string),
            is_super: is_super.map(ToString::to_string),
        });
        self
    }

    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable {
            return Err(DbError::DatabaseError(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ClosedConnection,
                Box::new("in-memory catalog marked unavailable".to_string()),
            )));
        }
        Ok(())
    }

    /// Active permission joined to its active page.
    fn active_permission(&self, permission_id: i32) -> Option<(&Page, &Permission)> {
        let permission = self
            .permissions
            .iter()
            .find(|p| p.id == permission_id && p.is_active)?;
        let page = self
            .pages
            .iter()
            .find(|p| p.id == permission.page_id && p.is_active)?;
        Some((page, permission))
    }

    fn is_active_role(&self, role_id: i32) -> bool {
        self.roles.iter().any(|r| r.id == role_id && r.is_active)
    }
}

fn matches_identity(keys: &[String], user_ref: &str) -> bool {
    keys.iter().any(|key| key == user_ref)
}

fn sort_grants(rows: &mut [GrantRow]) {
    rows.sort_by_key(|row| (row.page_id, row.permission_id, row.role_id()));
}

#[async_trait]
impl PermissionCatalog for InMemoryCatalog {
    async fn admin_profiles(&self, identity: &Identity) -> DbResult<Vec<AdminProfile>> {
        self.check_available()?;
        let keys = identity.lookup_keys();
        let email = identity.raw().to_lowercase();
        let mut profiles: Vec<AdminProfile> = self
            .admin_profiles
            .iter()
            .filter(|p| {
                matches_identity(&keys, &p.user_ref)
                    || p.email.as_deref().is_some_and(|e| e.to_lowercase() == email)
            })
            .cloned()
            .collect();
        profiles.sort_by_key(|p| p.id);
        Ok(profiles)
    }

    async fn user_accounts(&self, identity: &Identity) -> DbResult<Vec<UserAccount>> {
        self.check_available()?;
        let keys = identity.lookup_keys();
        let mut accounts: Vec<UserAccount> = self
            .user_accounts
            .iter()
            .filter(|a| matches_identity(&keys, &a.user_ref))
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn user_permission_grants(&self, identity: &Identity) -> DbResult<Vec<GrantRow>> {
        self.check_available()?;
        let keys = identity.lookup_keys();
        let mut rows: Vec<GrantRow> = self
            .user_permissions
            .iter()
            .filter(|up| matches_identity(&keys, &up.user_id))
            .filter_map(|up| {
                let (page, permission) = self.active_permission(up.permission_id)?;
                Some(GrantRow::from_parts(
                    page,
                    permission,
                    up.is_allowed.clone(),
                    GrantSource::User,
                ))
            })
            .collect();
        sort_grants(&mut rows);
        Ok(rows)
    }

    async fn role_permission_grants(&self, identity: &Identity) -> DbResult<Vec<GrantRow>> {
        self.check_available()?;
        let keys = identity.lookup_keys();
        let mut rows: Vec<GrantRow> = self
            .user_roles
            .iter()
            .filter(|ur| matches_identity(&keys, &ur.user_id) && self.is_active_role(ur.role_id))
            .flat_map(|ur| {
                self.role_permissions
                    .iter()
                    .filter(move |rp| rp.role_id == ur.role_id)
            })
            .filter_map(|rp| {
                let (page, permission) = self.active_permission(rp.permission_id)?;
                Some(GrantRow::from_parts(
                    page,
                    permission,
                    rp.is_allowed.clone(),
                    GrantSource::Role(rp.role_id),
                ))
            })
            .collect();
        sort_grants(&mut rows);
        Ok(rows)
    }

    async fn active_permissions(&self) -> DbResult<Vec<(Page, Permission)>> {
        self.check_available()?;
        let mut rows: Vec<(Page, Permission)> = self
            .permissions
            .iter()
            .filter_map(|p| self.active_permission(p.id))
            .map(|(page, permission)| (page.clone(), permission.clone()))
            .collect();
        rows.sort_by_key(|(_, permission)| permission.id);
        Ok(rows)
    }

    async fn user_permission_row_count(&self, identity: &Identity) -> DbResult<i64> {
        self.check_available()?;
        let keys = identity.lookup_keys();
        let count = self
            .user_permissions
            .iter()
            .filter(|up| matches_identity(&keys, &up.user_id))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(raw: &str) -> Identity {
        Identity::parse(raw).expect("valid identity")
    }

    #[test_log::test(tokio::test)]
    async fn overrides_skip_inactive_rows() {
        let catalog = InMemoryCatalog::default()
            .with_page(1, "/dashboard/income")
            .with_inactive_page(2, "/dashboard/archive")
            .with_permission(10, 1, "ADD")
            .with_inactive_permission(11, 1, "EDIT")
            .with_permission(12, 2, "VIEW")
            .with_user_permission("42", 10, Some("yes"))
            .with_user_permission("42", 11, Some("yes"))
            .with_user_permission("42", 12, Some("yes"));

        let rows = catalog
            .user_permission_grants(&identity("42"))
            .await
            .expect("catalog available");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].permission_id, 10);
        assert_eq!(rows[0].source, GrantSource::User);

        let raw_count = catalog
            .user_permission_row_count(&identity("42"))
            .await
            .expect("catalog available");
        assert_eq!(raw_count, 3);
    }

    #[test_log::test(tokio::test)]
    async fn role_grants_require_active_role() {
        let catalog = InMemoryCatalog::default()
            .with_page(1, "/dashboard/income")
            .with_permission(10, 1, "VIEW")
            .with_role(1, "Caseworker", true)
            .with_role(2, "Retired", false)
            .with_role_permission(1, 10, Some("1"))
            .with_role_permission(2, 10, Some("1"))
            .with_user_role("worker@example.org", 1)
            .with_user_role("worker@example.org", 2);

        let rows = catalog
            .role_permission_grants(&identity("worker@example.org"))
            .await
            .expect("catalog available");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role_id(), Some(1));
    }

    #[test_log::test(tokio::test)]
    async fn identity_matches_either_key_form() {
        let catalog = InMemoryCatalog::default()
            .with_page(1, "/dashboard/income")
            .with_permission(10, 1, "VIEW")
            .with_permission(11, 1, "ADD")
            .with_user_permission("7", 10, Some("yes"))
            .with_user_permission("007", 11, Some("yes"));

        let rows = catalog
            .user_permission_grants(&identity("007"))
            .await
            .expect("catalog available");

        assert_eq!(rows.len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn admin_profiles_match_email_ignoring_case() {
        let catalog = InMemoryCatalog::default()
            .with_admin_profile(1, "99", Some("director@example.org"), Some("Super Admin"))
            .with_admin_profile(2, "100", Some("clerk@example.org"), Some("Staff"));

        let profiles = catalog
            .admin_profiles(&identity("Director@Example.org"))
            .await
            .expect("catalog available");

        assert_eq!(profiles.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test_log::test(tokio::test)]
    async fn admin_profiles_return_every_match() {
        let catalog = InMemoryCatalog::default()
            .with_admin_profile(1, "director@example.org", None, Some("Staff"))
            .with_admin_profile(2, "77", Some("director@example.org"), Some("Super Admin"));

        let profiles = catalog
            .admin_profiles(&identity("director@example.org"))
            .await
            .expect("catalog available");

        assert_eq!(profiles.len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn unavailable_catalog_fails_every_query() {
        let catalog = InMemoryCatalog::default().unavailable();

        assert!(catalog.active_permissions().await.is_err());
        assert!(catalog.user_accounts(&identity("1")).await.is_err());
    }
}
