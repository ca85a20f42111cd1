use salvo::async_trait;

use caseguard_core::identity::Identity;
use caseguard_db::db::DbProvider;
use caseguard_db::db::query::{grant, profile};
use caseguard_db::error::DbResult;
use caseguard_db::model::catalog::grant::GrantRow;
use caseguard_db::model::catalog::{Page, Permission};
use caseguard_db::model::profile::{AdminProfile, UserAccount};

use super::PermissionCatalog;

/// Postgres-backed catalog. Every call checks out one pooled connection and
/// issues a single query.
#[derive(Clone)]
pub struct PgCatalog<P: DbProvider> {
    provider: P,
}

impl<P: DbProvider> PgCatalog<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: DbProvider + 'static> PermissionCatalog for PgCatalog<P> {
    async fn admin_profiles(&self, identity: &Identity) -> DbResult<Vec<AdminProfile>> {
        let mut conn = self.provider.get_connection().await?;
        profile::find_admin_profiles(&mut conn, identity).await
    }

    async fn user_accounts(&self, identity: &Identity) -> DbResult<Vec<UserAccount>> {
        let mut conn = self.provider.get_connection().await?;
        profile::find_user_accounts(&mut conn, identity).await
    }

    async fn user_permission_grants(&self, identity: &Identity) -> DbResult<Vec<GrantRow>> {
        let mut conn = self.provider.get_connection().await?;
        grant::user_permission_grants(&mut conn, identity).await
    }

    async fn role_permission_grants(&self, identity: &Identity) -> DbResult<Vec<GrantRow>> {
        let mut conn = self.provider.get_connection().await?;
        grant::role_permission_grants(&mut conn, identity).await
    }

    async fn active_permissions(&self) -> DbResult<Vec<(Page, Permission)>> {
        let mut conn = self.provider.get_connection().await?;
        grant::active_permissions(&mut conn).await
    }

    async fn user_permission_row_count(&self, identity: &Identity) -> DbResult<i64> {
        let mut conn = self.provider.get_connection().await?;
        grant::user_permission_row_count(&mut conn, identity).await
    }
}
