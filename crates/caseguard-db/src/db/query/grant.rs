//! Grant and permission lookups.
//!
//! Active-ness of pages, permissions and roles is filtered in SQL. The allow
//! flag, action key and route matching are left to the caller so those rules
//! live in exactly one place.

use caseguard_core::identity::Identity;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{page, permission, role, role_permission, user_permission, user_role};
use crate::error::DbResult;
use crate::model::catalog::grant::{GrantRow, GrantSource};
use crate::model::catalog::{Page, Permission};

/// ## Summary
/// Loads every direct override attached to the identity, under either of
/// its key forms, whose permission and page are active.
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn), fields(identity = %identity))]
pub async fn user_permission_grants(
    conn: &mut DbConnection<'_>,
    identity: &Identity,
) -> DbResult<Vec<GrantRow>> {
    let rows = user_permission::table
        .inner_join(permission::table.inner_join(page::table))
        .filter(user_permission::user_id.eq_any(identity.lookup_keys()))
        .filter(permission::is_active.eq(true))
        .filter(page::is_active.eq(true))
        .order((page::id, permission::id))
        .select((
            Page::as_select(),
            Permission::as_select(),
            user_permission::is_allowed,
        ))
        .load::<(Page, Permission, Option<String>)>(conn)
        .await?;

    tracing::trace!(row_count = rows.len(), "Loaded user permission grants");

    Ok(rows
        .into_iter()
        .map(|(page, permission, is_allowed)| {
            GrantRow::from_parts(&page, &permission, is_allowed, GrantSource::User)
        })
        .collect())
}

/// ## Summary
/// Loads every role grant reachable from the identity's role memberships,
/// restricted to active roles, permissions and pages.
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn), fields(identity = %identity))]
pub async fn role_permission_grants(
    conn: &mut DbConnection<'_>,
    identity: &Identity,
) -> DbResult<Vec<GrantRow>> {
    let rows = user_role::table
        .inner_join(role::table)
        .inner_join(role_permission::table.on(role_permission::role_id.eq(user_role::role_id)))
        .inner_join(permission::table.on(permission::id.eq(role_permission::permission_id)))
        .inner_join(page::table.on(page::id.eq(permission::page_id)))
        .filter(user_role::user_id.eq_any(identity.lookup_keys()))
        .filter(role::is_active.eq(true))
        .filter(permission::is_active.eq(true))
        .filter(page::is_active.eq(true))
        .order((page::id, permission::id, role::id))
        .select((
            Page::as_select(),
            Permission::as_select(),
            role_permission::is_allowed,
            role::id,
        ))
        .load::<(Page, Permission, Option<String>, i32)>(conn)
        .await?;

    tracing::trace!(row_count = rows.len(), "Loaded role permission grants");

    Ok(rows
        .into_iter()
        .map(|(page, permission, is_allowed, role_id)| {
            GrantRow::from_parts(&page, &permission, is_allowed, GrantSource::Role(role_id))
        })
        .collect())
}

/// ## Summary
/// Loads every active permission together with its active page.
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn))]
pub async fn active_permissions(conn: &mut DbConnection<'_>) -> DbResult<Vec<(Page, Permission)>> {
    Ok(permission::table
        .inner_join(page::table)
        .filter(permission::is_active.eq(true))
        .filter(page::is_active.eq(true))
        .order(permission::id)
        .select((Page::as_select(), Permission::as_select()))
        .load::<(Page, Permission)>(conn)
        .await?)
}

/// ## Summary
/// Counts the identity's raw override rows, regardless of flags or activity.
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn), fields(identity = %identity))]
pub async fn user_permission_row_count(
    conn: &mut DbConnection<'_>,
    identity: &Identity,
) -> DbResult<i64> {
    Ok(user_permission::table
        .filter(user_permission::user_id.eq_any(identity.lookup_keys()))
        .count()
        .get_result::<i64>(conn)
        .await?)
}
