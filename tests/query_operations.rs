//! Filter/sort pipeline tests
//!
//! These tests verify that views contain exactly the matching elements, in
//! the requested order, and that the source collection is never touched.

use chrono::{DateTime, TimeZone, Utc};
use makemyad::{
    apply, seed, Ad, AdCategory, AdFilters, AdSortKey, AdStatus, RoleFilters, RoleSortKey,
    SortOrder, User, UserFilters, UserSortKey,
};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn user(name: &str, email: &str, active: bool) -> User {
    User {
        id: name.to_lowercase(),
        name: name.into(),
        email: email.into(),
        phone: None,
        location: None,
        role: "User".into(),
        is_active: active,
        created_at: day(1),
        last_login: None,
    }
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.name.as_str()).collect()
}

fn alice_bob() -> Vec<User> {
    vec![user("Alice", "a@x.com", true), user("Bob", "b@x.com", false)]
}

// ============================================================================
// Users
// ============================================================================

#[test]
fn active_flag_filters_exactly() {
    let users = alice_bob();
    let view = apply(&users, &UserFilters { is_active: Some(true), ..Default::default() });
    assert_eq!(names(&view), ["Alice"]);
}

#[test]
fn search_is_case_insensitive_over_name_and_email() {
    let users = alice_bob();
    let by_name = apply(&users, &UserFilters { search: Some("bob".into()), ..Default::default() });
    assert_eq!(names(&by_name), ["Bob"]);

    let by_email = apply(&users, &UserFilters { search: Some("A@X".into()), ..Default::default() });
    assert_eq!(names(&by_email), ["Alice"]);
}

#[test]
fn empty_search_imposes_nothing() {
    let users = alice_bob();
    let view = apply(&users, &UserFilters { search: Some(String::new()), ..Default::default() });
    assert_eq!(view, users);
}

#[test]
fn fields_combine_with_and() {
    let users = seed::users();
    let view = apply(
        &users,
        &UserFilters {
            role: Some("User".into()),
            is_active: Some(true),
            search: Some("o".into()),
            ..Default::default()
        },
    );
    assert_eq!(names(&view), ["Bob Johnson", "Charlie Wilson"]);
}

#[test]
fn role_filter_is_exact() {
    let users = seed::users();
    let view = apply(&users, &UserFilters { role: Some("user".into()), ..Default::default() });
    assert!(view.is_empty());
}

#[test]
fn sort_users_by_name_ignores_case() {
    let users = vec![user("bob", "1@x.com", true), user("Alice", "2@x.com", true), user("carol", "3@x.com", true)];
    let view = apply(&users, &UserFilters { sort_by: Some(UserSortKey::Name), ..Default::default() });
    assert_eq!(names(&view), ["Alice", "bob", "carol"]);

    let desc = apply(
        &users,
        &UserFilters {
            sort_by: Some(UserSortKey::Name),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        },
    );
    assert_eq!(names(&desc), ["carol", "bob", "Alice"]);
}

/// Users that never logged in sort as the earliest instant
#[test]
fn missing_last_login_sorts_first() {
    let mut never = user("Never", "n@x.com", true);
    never.last_login = None;
    let mut recent = user("Recent", "r@x.com", true);
    recent.last_login = Some(day(20));
    let mut older = user("Older", "o@x.com", true);
    older.last_login = Some(day(2));
    let users = vec![recent, never, older];

    let asc = apply(&users, &UserFilters { sort_by: Some(UserSortKey::LastLogin), ..Default::default() });
    assert_eq!(names(&asc), ["Never", "Older", "Recent"]);

    let desc = apply(
        &users,
        &UserFilters {
            sort_by: Some(UserSortKey::LastLogin),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        },
    );
    assert_eq!(names(&desc), ["Recent", "Older", "Never"]);
}

/// Equal keys keep their input order
#[test]
fn sort_is_stable() {
    let users = vec![
        user("Zed", "same@x.com", true),
        user("Amy", "same@x.com", true),
        user("Max", "SAME@x.com", true),
    ];
    let view = apply(&users, &UserFilters { sort_by: Some(UserSortKey::Email), ..Default::default() });
    assert_eq!(names(&view), ["Zed", "Amy", "Max"]);
}

/// A sort order without a sort key does not reorder
#[test]
fn order_without_key_passes_through() {
    let users = seed::users();
    let view = apply(&users, &UserFilters { sort_order: Some(SortOrder::Desc), ..Default::default() });
    assert_eq!(view, users);
}

#[test]
fn empty_spec_returns_everything_in_order() {
    let users = seed::users();
    assert_eq!(apply(&users, &UserFilters::default()), users);
    assert!(apply(&Vec::<User>::new(), &UserFilters::default()).is_empty());
}

#[test]
fn no_match_is_empty_not_error() {
    let users = seed::users();
    let view = apply(&users, &UserFilters { search: Some("zzz".into()), ..Default::default() });
    assert!(view.is_empty());
}

/// Applying a spec twice gives the same view and leaves the source alone
#[test]
fn repeated_application_is_idempotent() {
    let users = seed::users();
    let before = users.clone();
    let spec = UserFilters {
        sort_by: Some(UserSortKey::CreatedAt),
        sort_order: Some(SortOrder::Desc),
        ..Default::default()
    };
    let first = apply(&users, &spec);
    let second = apply(&users, &spec);
    assert_eq!(first, second);
    assert_eq!(users, before);
    assert_eq!(first[0].name, "Charlie Wilson");
}

// ============================================================================
// Roles
// ============================================================================

#[test]
fn role_search_covers_description() {
    let roles = seed::roles(&seed::permissions());
    let view = apply(&roles, &RoleFilters { search: Some("moderate".into()), ..Default::default() });
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].name, "Moderator");
}

#[test]
fn role_default_flag_and_name_sort() {
    let roles = seed::roles(&seed::permissions());
    let defaults = apply(&roles, &RoleFilters { is_default: Some(true), ..Default::default() });
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].name, "User");

    let sorted = apply(
        &roles,
        &RoleFilters {
            sort_by: Some(RoleSortKey::Name),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        },
    );
    let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["User", "Moderator", "Guest", "Admin"]);
}

// ============================================================================
// Ads
// ============================================================================

fn prices(ads: &[Ad]) -> Vec<f64> {
    ads.iter().map(|a| a.price).collect()
}

#[test]
fn sort_ads_by_price() {
    let mut ads = seed::ads();
    ads.reverse();

    let asc = apply(&ads, &AdFilters { sort_by: Some(AdSortKey::Price), ..Default::default() });
    assert_eq!(prices(&asc), [899.0, 18500.0]);

    let desc = apply(
        &ads,
        &AdFilters {
            sort_by: Some(AdSortKey::Price),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        },
    );
    assert_eq!(prices(&desc), [18500.0, 899.0]);
}

#[test]
fn price_bounds_are_inclusive() {
    let ads = seed::ads();
    let exact = apply(&ads, &AdFilters { min_price: Some(899.0), max_price: Some(899.0), ..Default::default() });
    assert_eq!(prices(&exact), [899.0]);

    let above = apply(&ads, &AdFilters { min_price: Some(900.0), ..Default::default() });
    assert_eq!(prices(&above), [18500.0]);

    let below = apply(&ads, &AdFilters { max_price: Some(18499.99), ..Default::default() });
    assert_eq!(prices(&below), [899.0]);
}

#[test]
fn ad_category_location_and_search() {
    let ads = seed::ads();
    let vehicles = apply(&ads, &AdFilters { category: Some(AdCategory::Vehicles), ..Default::default() });
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].title, "2019 Honda Civic");

    let ny = apply(&ads, &AdFilters { location: Some("new york".into()), ..Default::default() });
    assert_eq!(ny[0].id, "1");

    let transmission = apply(&ads, &AdFilters { search: Some("TRANSMISSION".into()), ..Default::default() });
    assert_eq!(transmission[0].id, "2");
}

#[test]
fn ad_owner_and_status() {
    let mut ads = seed::ads();
    ads[1].status = AdStatus::Sold;

    let mine = apply(&ads, &AdFilters { user_id: Some("user1".into()), ..Default::default() });
    assert_eq!(mine.len(), 1);

    let sold = apply(&ads, &AdFilters { status: Some(AdStatus::Sold), ..Default::default() });
    assert_eq!(sold[0].id, "2");
}

#[test]
fn newest_first_and_relevance() {
    let mut ads = seed::ads();
    ads.reverse();
    let newest = apply(&ads, &AdFilters::newest_first());
    assert_eq!(newest[0].id, "1");

    let relevance = apply(&ads, &AdFilters { sort_by: Some(AdSortKey::Relevance), ..Default::default() });
    assert_eq!(relevance, ads);
}

// ============================================================================
// Wire shape
// ============================================================================

#[test]
fn filters_deserialize_from_camel_case() {
    let f: UserFilters = serde_json::from_str(r#"{"isActive":false,"sortBy":"lastLogin","sortOrder":"desc"}"#).unwrap();
    assert_eq!(f.is_active, Some(false));
    assert_eq!(f.sort_by, Some(UserSortKey::LastLogin));
    assert_eq!(f.sort_order, Some(SortOrder::Desc));

    let a: AdFilters = serde_json::from_str(r#"{"minPrice":10,"category":"Tools"}"#).unwrap();
    assert_eq!(a.min_price, Some(10.0));
    assert_eq!(a.category, Some(AdCategory::Tools));
}
