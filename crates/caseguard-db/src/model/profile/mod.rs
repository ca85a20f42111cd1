//! Profile rows backing the two privilege predicates.

use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Staff profile; source of the Super Admin predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::admin_profile)]
#[diesel(check_for_backend(Pg))]
pub struct AdminProfile {
    pub id: i32,
    pub user_ref: String,
    pub email: Option<String>,
    pub role_type: Option<String>,
}

/// Application account; source of the Super User predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::user_account)]
#[diesel(check_for_backend(Pg))]
pub struct UserAccount {
    pub id: i32,
    pub user_ref: String,
    pub username: Option<String>,
    /// Heterogeneous truthy encoding.
    pub is_super: Option<String>,
}
