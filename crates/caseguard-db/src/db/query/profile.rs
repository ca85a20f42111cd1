//! Profile lookups for the privilege predicates.
//!
//! An identity can match more than one profile row (by account reference
//! under either key form, or by contact address), so every match is
//! returned and the predicate is applied to each.

use caseguard_core::identity::Identity;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{admin_profile, user_account};
use crate::error::DbResult;
use crate::model::profile::{AdminProfile, UserAccount};

diesel::define_sql_function! {
    /// Postgres `lower(text)`.
    fn lower(x: Text) -> Text;
}

/// ## Summary
/// Finds every staff profile for an identity, matched by account reference
/// or by contact address (case-insensitively).
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn), fields(identity = %identity))]
pub async fn find_admin_profiles(
    conn: &mut DbConnection<'_>,
    identity: &Identity,
) -> DbResult<Vec<AdminProfile>> {
    Ok(admin_profile::table
        .filter(
            admin_profile::user_ref.eq_any(identity.lookup_keys()).or(lower(
                admin_profile::email.assume_not_null(),
            )
            .eq(identity.raw().to_lowercase())),
        )
        .order(admin_profile::id)
        .select(AdminProfile::as_select())
        .load::<AdminProfile>(conn)
        .await?)
}

/// ## Summary
/// Finds every application account for an identity.
///
/// ## Errors
/// Returns a database error if the query fails.
#[tracing::instrument(skip(conn), fields(identity = %identity))]
pub async fn find_user_accounts(
    conn: &mut DbConnection<'_>,
    identity: &Identity,
) -> DbResult<Vec<UserAccount>> {
    Ok(user_account::table
        .filter(user_account::user_ref.eq_any(identity.lookup_keys()))
        .order(user_account::id)
        .select(UserAccount::as_select())
        .load::<UserAccount>(conn)
        .await?)
}
