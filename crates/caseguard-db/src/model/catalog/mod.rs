//! Rows of the six permission catalog tables.

pub mod grant;

use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::page)]
#[diesel(check_for_backend(Pg))]
pub struct Page {
    pub id: i32,
    /// Authoritative but not guaranteed to be normalized.
    pub route_path: String,
    pub page_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::permission)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(Page, foreign_key = page_id))]
pub struct Permission {
    pub id: i32,
    pub page_id: i32,
    /// Stored upper-case; compared case-insensitively.
    pub action_key: String,
    pub is_active: bool,
}

impl Permission {
    #[must_use]
    pub fn has_action(&self, action_key: &str) -> bool {
        self.action_key.trim().eq_ignore_ascii_case(action_key.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::role)]
#[diesel(check_for_backend(Pg))]
pub struct Role {
    pub id: i32,
    pub role_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::role_permission)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(role_id, permission_id))]
#[diesel(belongs_to(Role, foreign_key = role_id))]
#[diesel(belongs_to(Permission, foreign_key = permission_id))]
pub struct RolePermission {
    pub role_id: i32,
    pub permission_id: i32,
    pub is_allowed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::user_role)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(user_id, role_id))]
#[diesel(belongs_to(Role, foreign_key = role_id))]
pub struct UserRole {
    /// Numeric account id or address-like string.
    pub user_id: String,
    pub role_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::user_permission)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(user_id, permission_id))]
#[diesel(belongs_to(Permission, foreign_key = permission_id))]
pub struct UserPermission {
    /// Numeric account id or address-like string.
    pub user_id: String,
    pub permission_id: i32,
    pub is_allowed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_key_comparison_ignores_case() {
        let permission = Permission {
            id: 1,
            page_id: 1,
            action_key: "ADD".to_string(),
            is_active: true,
        };
        assert!(permission.has_action("add"));
        assert!(permission.has_action(" Add "));
        assert!(!permission.has_action("EDIT"));
    }
}
