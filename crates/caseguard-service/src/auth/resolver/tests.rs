//! Tests for route permission resolution.

use std::sync::Arc;

use caseguard_core::bypass::BypassRegistry;
use caseguard_core::switch::EnforcementSwitch;

use super::*;
use crate::auth::catalog::InMemoryCatalog;
use crate::auth::decision::DenyReason;

fn identity(raw: &str) -> Identity {
    Identity::parse(raw).expect("valid identity")
}

fn resolver(catalog: InMemoryCatalog) -> PermissionResolver {
    PermissionResolver::new(Arc::new(catalog))
}

fn expect_deny(decision: Decision) -> DenyDiagnostics {
    match decision {
        Decision::Deny(diagnostics) => *diagnostics,
        Decision::Allow(grant) => panic!("expected deny, got {grant:?}"),
    }
}

fn expect_allow(decision: Decision) -> Grant {
    match decision {
        Decision::Allow(grant) => grant,
        Decision::Deny(diagnostics) => panic!("expected allow, got {diagnostics:?}"),
    }
}

/// Income module pages with VIEW/ADD permissions on the parent page.
fn income_catalog() -> InMemoryCatalog {
    InMemoryCatalog::default()
        .with_page(1, "/dashboard/income")
        .with_permission(10, 1, "VIEW")
        .with_permission(11, 1, "ADD")
}

#[test_log::test(tokio::test)]
async fn repeated_checks_agree() {
    let resolver = resolver(
        income_catalog()
            .with_role(1, "Caseworker", true)
            .with_role_permission(1, 10, Some("yes"))
            .with_user_role("31", 1),
    );
    let id = identity("31");

    let first = resolver.resolve(&id, "/dashboard/income", None).await;
    let second = resolver.resolve(&id, "/dashboard/income", None).await;
    assert_eq!(first, second);
    assert!(first.is_allowed());

    let first = resolver.resolve(&id, "/dashboard/income/add", None).await;
    let second = resolver.resolve(&id, "/dashboard/income/add", None).await;
    assert_eq!(first, second);
    assert!(!first.is_allowed());
}

#[test_log::test(tokio::test)]
async fn most_specific_route_wins() {
    let resolver = resolver(
        InMemoryCatalog::default()
            .with_page(1, "/a")
            .with_page(2, "/a/b")
            .with_permission(10, 1, "VIEW")
            .with_permission(20, 2, "VIEW")
            .with_user_permission("8", 10, Some("1"))
            .with_user_permission("8", 20, Some("1")),
    );

    let grant = expect_allow(resolver.resolve(&identity("8"), "/a/b/c", Some("view")).await);
    let matched = grant.matched().expect("catalog grant");
    assert_eq!(matched.page_id, 2);
    assert_eq!(matched.permission_id, 20);
    assert_eq!(matched.route_path, "/a/b");
}

#[test_log::test(tokio::test)]
async fn specificity_ignores_stored_formatting() {
    let resolver = resolver(
        InMemoryCatalog::default()
            .with_page(1, "/A/")
            .with_page(2, "  /a/B?tab=1")
            .with_permission(10, 1, "VIEW")
            .with_permission(20, 2, "view")
            .with_user_permission("8", 10, Some("1"))
            .with_user_permission("8", 20, Some("true")),
    );

    let grant = expect_allow(resolver.resolve(&identity("8"), "/a/b/c", None).await);
    assert_eq!(grant.matched().map(|m| m.permission_id), Some(20));
}

#[test_log::test(tokio::test)]
async fn bypassed_route_allows_empty_footprint() {
    let resolver = resolver(InMemoryCatalog::default());

    let grant = expect_allow(
        resolver
            .resolve(&identity("nobody@example.org"), "/dashboard/profile/", None)
            .await,
    );
    assert_eq!(grant, Grant::Bypassed);
}

#[test_log::test(tokio::test)]
async fn bypass_does_not_touch_the_catalog() {
    let resolver = resolver(InMemoryCatalog::default().unavailable());

    let grant = expect_allow(resolver.resolve(&identity("1"), "/dashboard", None).await);
    assert_eq!(grant, Grant::Bypassed);
}

#[test_log::test(tokio::test)]
async fn bypass_is_exact_match_only() {
    let resolver = resolver(InMemoryCatalog::default());

    let diagnostics = expect_deny(
        resolver
            .resolve(&identity("1"), "/dashboard/profile/edit", None)
            .await,
    );
    assert_eq!(diagnostics.route, "/dashboard/profile/edit");
}

#[test_log::test(tokio::test)]
async fn configured_bypass_routes_replace_defaults() {
    let resolver = resolver(InMemoryCatalog::default())
        .with_bypass(BypassRegistry::new(["/help"]).expect("valid routes"));

    assert!(resolver.resolve(&identity("1"), "/help/", None).await.is_allowed());
    assert!(!resolver.resolve(&identity("1"), "/dashboard/profile", None).await.is_allowed());
}

#[test_log::test(tokio::test)]
async fn disabled_enforcement_allows_unknown_route() {
    let resolver =
        resolver(InMemoryCatalog::default()).with_switch(EnforcementSwitch::fixed(true));

    let grant = expect_allow(
        resolver
            .resolve(&identity("1"), "/dashboard/not-a-page", None)
            .await,
    );
    assert_eq!(grant, Grant::EnforcementDisabled);
}

#[test_log::test(tokio::test)]
async fn super_admin_allows_unregistered_route() {
    let resolver = resolver(
        InMemoryCatalog::default().with_admin_profile(1, "77", None, Some("Supper Admin")),
    );

    let grant = expect_allow(
        resolver
            .resolve(&identity("77"), "/dashboard/unregistered", Some("DELETE"))
            .await,
    );
    assert_eq!(grant, Grant::SuperAdmin);
}

#[test_log::test(tokio::test)]
async fn super_user_does_not_satisfy_route_checks() {
    let resolver = resolver(
        InMemoryCatalog::default().with_user_account(1, "77", Some("admin"), Some("yes")),
    );
    let id = identity("77");

    assert!(resolver.is_super_user(&id).await.expect("catalog available"));
    assert!(!resolver.is_super_admin(&id).await.expect("catalog available"));
    assert!(!resolver.resolve(&id, "/dashboard/income", None).await.is_allowed());
}

#[test_log::test(tokio::test)]
async fn unknown_route_denies_without_catalog_match() {
    let resolver = resolver(income_catalog());

    let diagnostics = expect_deny(
        resolver
            .resolve(&identity("5"), "/dashboard/does-not-exist", None)
            .await,
    );
    assert_eq!(diagnostics.reason, DenyReason::NoGrant);
    assert!(!diagnostics.permission_exists_in_db);
    assert_eq!(diagnostics.page_id, None);
    assert_eq!(diagnostics.permission_id, None);
    assert_eq!(diagnostics.route, "/dashboard/does-not-exist");
    assert_eq!(diagnostics.action_key, "VIEW");
}

#[test_log::test(tokio::test)]
async fn override_alone_is_sufficient() {
    let resolver = resolver(income_catalog().with_user_permission("12", 11, Some("Yes")));

    let grant = expect_allow(
        resolver
            .resolve(&identity("12"), "/dashboard/income", Some("add"))
            .await,
    );
    assert_eq!(
        grant,
        Grant::UserOverride(GrantMatch {
            page_id: 1,
            permission_id: 11,
            route_path: "/dashboard/income".to_string(),
            role_id: None,
        })
    );
}

#[test_log::test(tokio::test)]
async fn role_grant_alone_is_sufficient() {
    let resolver = resolver(
        income_catalog()
            .with_role(4, "Reviewer", true)
            .with_role_permission(4, 10, Some("1"))
            .with_user_role("reviewer@example.org", 4),
    );

    let grant = expect_allow(
        resolver
            .resolve(&identity("reviewer@example.org"), "/dashboard/income", Some("VIEW"))
            .await,
    );
    assert_eq!(grant.matched().and_then(|m| m.role_id), Some(4));
    assert!(matches!(grant, Grant::RoleGrant(_)));
}

#[test_log::test(tokio::test)]
async fn prefix_action_and_parent_page_override() {
    let resolver = resolver(
        InMemoryCatalog::default()
            .with_page(3, "/dashboard/baseline-qol")
            .with_permission(30, 3, "VIEW")
            .with_permission(31, 3, "ADD")
            .with_user_permission("field.officer@example.org", 31, Some("yes")),
    );

    let grant = expect_allow(
        resolver
            .resolve(
                &identity("field.officer@example.org"),
                "/dashboard/baseline-qol/add",
                None,
            )
            .await,
    );
    assert_eq!(grant.matched().map(|m| m.permission_id), Some(31));
}

#[test_log::test(tokio::test)]
async fn unknown_route_diagnostics_for_ordinary_identity() {
    let resolver = resolver(
        income_catalog()
            .with_user_permission("5", 10, Some("yes"))
            .with_user_permission("5", 11, Some("no")),
    );

    let diagnostics = expect_deny(
        resolver
            .resolve(&identity("5"), "/dashboard/does-not-exist", None)
            .await,
    );
    assert!(!diagnostics.permission_exists_in_db);
    assert_eq!(diagnostics.granted_permission_ids, vec![10]);
    assert_eq!(diagnostics.granted_permission_count, 1);
    assert_eq!(diagnostics.user_permission_rows, 2);
}

#[test_log::test(tokio::test)]
async fn deny_reports_the_permission_that_would_satisfy() {
    let resolver = resolver(
        income_catalog()
            .with_role(1, "Clerk", true)
            .with_role_permission(1, 10, Some("yes"))
            .with_user_role("5", 1),
    );

    let diagnostics = expect_deny(
        resolver
            .resolve(&identity("5"), "/dashboard/income/add", None)
            .await,
    );
    assert_eq!(diagnostics.action_key, "ADD");
    assert!(diagnostics.permission_exists_in_db);
    assert_eq!(diagnostics.page_id, Some(1));
    assert_eq!(diagnostics.permission_id, Some(11));
    assert_eq!(diagnostics.granted_permission_ids, vec![10]);
    assert_eq!(diagnostics.user_permission_rows, 0);
}

#[test_log::test(tokio::test)]
async fn false_override_does_not_block_role_grant() {
    let resolver = resolver(
        income_catalog()
            .with_user_permission("5", 10, Some("no"))
            .with_role(1, "Clerk", true)
            .with_role_permission(1, 10, Some("yes"))
            .with_user_role("5", 1),
    );

    let grant = expect_allow(resolver.resolve(&identity("5"), "/dashboard/income", None).await);
    assert!(matches!(grant, Grant::RoleGrant(_)));
}

#[test_log::test(tokio::test)]
async fn inactive_rows_contribute_nothing() {
    let resolver = resolver(
        InMemoryCatalog::default()
            .with_inactive_page(1, "/dashboard/archive")
            .with_permission(10, 1, "VIEW")
            .with_page(2, "/dashboard/income")
            .with_inactive_permission(20, 2, "VIEW")
            .with_page(3, "/dashboard/reports")
            .with_permission(30, 3, "VIEW")
            .with_role(1, "Retired", false)
            .with_role_permission(1, 30, Some("yes"))
            .with_user_role("5", 1)
            .with_user_permission("5", 10, Some("yes"))
            .with_user_permission("5", 20, Some("yes")),
    );
    let id = identity("5");

    for route in ["/dashboard/archive", "/dashboard/income", "/dashboard/reports"] {
        let diagnostics = expect_deny(resolver.resolve(&id, route, None).await);
        assert!(diagnostics.granted_permission_ids.is_empty(), "{route}");
    }
}

#[test_log::test(tokio::test)]
async fn grant_on_other_action_does_not_apply() {
    let resolver = resolver(income_catalog().with_user_permission("5", 10, Some("yes")));

    assert!(
        !resolver
            .resolve(&identity("5"), "/dashboard/income", Some("ADD"))
            .await
            .is_allowed()
    );
}

#[test_log::test(tokio::test)]
async fn sibling_prefix_is_not_a_parent() {
    let resolver = resolver(income_catalog().with_user_permission("5", 10, Some("yes")));

    assert!(
        !resolver
            .resolve(&identity("5"), "/dashboard/income-summary", None)
            .await
            .is_allowed()
    );
}

#[test_log::test(tokio::test)]
async fn route_match_ignores_case_and_query() {
    let resolver = resolver(income_catalog().with_user_permission("5", 10, Some("yes")));

    assert!(
        resolver
            .resolve(&identity("5"), "/Dashboard/Income/?page=2", None)
            .await
            .is_allowed()
    );
}

#[test_log::test(tokio::test)]
async fn numeric_identity_matches_string_keyed_grant() {
    let resolver = resolver(income_catalog().with_user_permission("0042", 10, Some("yes")));

    assert!(
        resolver
            .resolve(&identity("0042"), "/dashboard/income", None)
            .await
            .is_allowed()
    );
    assert!(
        !resolver
            .resolve(&identity("42"), "/dashboard/income", None)
            .await
            .is_allowed()
    );
}

#[test_log::test(tokio::test)]
async fn store_failure_fails_closed() {
    let resolver = resolver(income_catalog().unavailable());

    let diagnostics = expect_deny(
        resolver
            .resolve(&identity("5"), "/dashboard/income/add?x=1", None)
            .await,
    );
    assert_eq!(diagnostics.reason, DenyReason::StoreUnavailable);
    assert_eq!(diagnostics.route, "/dashboard/income/add");
    assert_eq!(diagnostics.action_key, "ADD");
}

#[test_log::test(tokio::test)]
async fn empty_route_denies() {
    let resolver = resolver(
        InMemoryCatalog::default()
            .with_page(1, "")
            .with_permission(10, 1, "VIEW")
            .with_user_permission("5", 10, Some("yes")),
    );

    let diagnostics = expect_deny(resolver.resolve(&identity("5"), "   ", None).await);
    assert_eq!(diagnostics.route, "");
    assert!(!diagnostics.permission_exists_in_db);
}

#[test_log::test(tokio::test)]
async fn from_config_rejects_blank_bypass_route() {
    let config = AuthzConfig {
        bypass_routes: vec![" ".to_string()],
        ..AuthzConfig::default()
    };

    assert!(PermissionResolver::from_config(Arc::new(InMemoryCatalog::default()), &config).is_err());
}
