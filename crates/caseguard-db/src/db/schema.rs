// Catalog tables. Owned and migrated by the provisioning tooling; mirrored
// here for querying only.

diesel::table! {
    page (id) {
        id -> Int4,
        route_path -> Text,
        page_name -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    permission (id) {
        id -> Int4,
        page_id -> Int4,
        action_key -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    role (id) {
        id -> Int4,
        role_name -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    role_permission (role_id, permission_id) {
        role_id -> Int4,
        permission_id -> Int4,
        is_allowed -> Nullable<Text>,
    }
}

diesel::table! {
    user_role (user_id, role_id) {
        user_id -> Text,
        role_id -> Int4,
    }
}

diesel::table! {
    user_permission (user_id, permission_id) {
        user_id -> Text,
        permission_id -> Int4,
        is_allowed -> Nullable<Text>,
    }
}

diesel::table! {
    admin_profile (id) {
        id -> Int4,
        user_ref -> Text,
        email -> Nullable<Text>,
        role_type -> Nullable<Text>,
    }
}

diesel::table! {
    user_account (id) {
        id -> Int4,
        user_ref -> Text,
        username -> Nullable<Text>,
        is_super -> Nullable<Text>,
    }
}

diesel::joinable!(permission -> page (page_id));
diesel::joinable!(role_permission -> permission (permission_id));
diesel::joinable!(role_permission -> role (role_id));
diesel::joinable!(user_permission -> permission (permission_id));
diesel::joinable!(user_role -> role (role_id));

diesel::allow_tables_to_appear_in_same_query!(
    page,
    permission,
    role,
    role_permission,
    user_role,
    user_permission,
    admin_profile,
    user_account,
);
