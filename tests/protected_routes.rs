//! Route guard tests
//!
//! Guards check authentication, then the required role, then the required
//! permissions, and report what was missing.

use makemyad::{seed, Access, Catalog, MarketCap, MarketError, RouteGuard, User};

fn setup() -> (Catalog, Vec<User>) {
    let m = seed::marketplace();
    (m.catalog().clone(), m.users().to_vec())
}

fn by_role<'a>(users: &'a [User], role: &str) -> &'a User {
    users.iter().find(|u| u.role == role).unwrap()
}

#[test]
fn unauthenticated_redirects_to_fallback() {
    let (catalog, _) = setup();
    assert_eq!(
        RouteGuard::authenticated().check(None, &catalog),
        Access::Redirect { to: "/".into() }
    );
    assert_eq!(
        RouteGuard::role("admin").with_fallback("/login").check(None, &catalog),
        Access::Redirect { to: "/login".into() }
    );
}

#[test]
fn authenticated_guard_admits_anyone_signed_in() {
    let (catalog, users) = setup();
    assert!(RouteGuard::authenticated().check(Some(by_role(&users, "User")), &catalog).is_granted());
}

#[test]
fn required_role_compares_case_insensitively() {
    let (catalog, users) = setup();
    let admin = by_role(&users, "Admin");
    let moderator = by_role(&users, "Moderator");

    assert!(RouteGuard::role("admin").check(Some(admin), &catalog).is_granted());
    assert_eq!(
        RouteGuard::role("admin").check(Some(moderator), &catalog),
        Access::RoleDenied { required: "admin".into(), actual: "Moderator".into() }
    );
}

#[test]
fn missing_permissions_are_listed() {
    let (catalog, users) = setup();
    let regular = by_role(&users, "User");
    let guard = RouteGuard::permissions([
        MarketCap::CREATE_ADS,
        MarketCap::MANAGE_USERS,
        MarketCap::VIEW_ANALYTICS,
    ]);

    assert_eq!(
        guard.check(Some(regular), &catalog),
        Access::PermissionDenied {
            missing: vec![MarketCap::MANAGE_USERS, MarketCap::VIEW_ANALYTICS]
        }
    );
    assert!(guard.check(Some(by_role(&users, "Admin")), &catalog).is_granted());
}

/// Role is checked before permissions
#[test]
fn role_check_precedes_permissions() {
    let (catalog, users) = setup();
    let guard = RouteGuard {
        required_role: Some("moderator".into()),
        required_permissions: vec![MarketCap::MANAGE_ROLES],
        ..RouteGuard::default()
    };
    let access = guard.check(Some(by_role(&users, "User")), &catalog);
    assert!(matches!(access, Access::RoleDenied { .. }));
}

#[test]
fn access_converts_to_errors() {
    assert_eq!(Access::Granted.into_result(), Ok(()));
    assert_eq!(
        Access::Redirect { to: "/".into() }.into_result(),
        Err(MarketError::Unauthenticated)
    );
    let denied = Access::PermissionDenied { missing: vec![MarketCap::MANAGE_USERS] }.into_result();
    assert_eq!(
        denied,
        Err(MarketError::Forbidden("required permissions: manage users".into()))
    );
}
