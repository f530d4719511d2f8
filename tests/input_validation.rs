//! Input validation tests for create/edit payloads

use makemyad::forms::is_valid_email;
use makemyad::{
    AdCategory, AdPatch, ContactInfo, MarketError, NewAd, NewRole, NewUser, RolePatch, UserPatch,
};

fn field_errors(err: MarketError) -> makemyad::FieldErrors {
    match err {
        MarketError::Validation(f) => f,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn ad() -> NewAd {
    NewAd {
        title: "Cordless drill".into(),
        description: "18V, two batteries".into(),
        price: 75.0,
        category: AdCategory::Tools,
        location: "Austin, TX".into(),
        images: vec![],
        contact_info: ContactInfo { email: "seller@example.com".into(), phone: None },
    }
}

// ============================================================================
// Email
// ============================================================================

#[test]
fn email_pattern() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email("john.doe@example.com"));
    assert!(!is_valid_email("john.doe"));
    assert!(!is_valid_email("john@example"));
    assert!(!is_valid_email("@."));
}

// ============================================================================
// Users
// ============================================================================

/// Every failing field is reported in one go
#[test]
fn new_user_reports_all_fields() {
    let errors = field_errors(NewUser::default().validate().unwrap_err());
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get("name"), Some("Name is required"));
    assert_eq!(errors.get("email"), Some("Email is required"));
    assert_eq!(errors.get("role"), Some("Role is required"));
}

#[test]
fn new_user_rejects_bad_email() {
    let u = NewUser {
        name: "Dana".into(),
        email: "dana-at-example".into(),
        role: "User".into(),
        ..Default::default()
    };
    let errors = field_errors(u.validate().unwrap_err());
    assert_eq!(errors.get("email"), Some("Email is invalid"));
    assert_eq!(errors.len(), 1);
}

#[test]
fn whitespace_counts_as_blank() {
    let u = NewUser {
        name: "   ".into(),
        email: "d@example.com".into(),
        role: "User".into(),
        ..Default::default()
    };
    assert!(field_errors(u.validate().unwrap_err()).contains("name"));
}

#[test]
fn user_patch_checks_present_fields_only() {
    assert!(UserPatch::default().validate().is_ok());
    let patch = UserPatch { email: Some("nope".into()), ..Default::default() };
    assert!(field_errors(patch.validate().unwrap_err()).contains("email"));
}

/// New users default to active when the flag is omitted
#[test]
fn new_user_defaults_active() {
    let u: NewUser = serde_json::from_str(r#"{"name":"E","email":"e@x.io","role":"User"}"#).unwrap();
    assert!(u.is_active);
}

// ============================================================================
// Roles
// ============================================================================

#[test]
fn new_role_requires_permissions() {
    let r = NewRole {
        name: "Reviewer".into(),
        description: "Reviews listings".into(),
        permissions: vec![],
        is_default: false,
    };
    let errors = field_errors(r.validate().unwrap_err());
    assert_eq!(errors.get("permissions"), Some("At least one permission is required"));
}

#[test]
fn role_patch_rejects_emptying_permissions() {
    let patch = RolePatch { permissions: Some(vec![]), ..Default::default() };
    assert!(field_errors(patch.validate().unwrap_err()).contains("permissions"));
    assert!(RolePatch { name: Some("Ok".into()), ..Default::default() }.validate().is_ok());
}

// ============================================================================
// Ads
// ============================================================================

#[test]
fn valid_ad_passes() {
    assert!(ad().validate().is_ok());
}

#[test]
fn ad_price_must_be_non_negative_and_finite() {
    for price in [-1.0, f64::NAN, f64::INFINITY] {
        let a = NewAd { price, ..ad() };
        assert!(field_errors(a.validate().unwrap_err()).contains("price"));
    }
    assert!(NewAd { price: 0.0, ..ad() }.validate().is_ok());
}

#[test]
fn ad_contact_email_is_checked() {
    let a = NewAd {
        contact_info: ContactInfo { email: "seller".into(), phone: None },
        ..ad()
    };
    assert!(field_errors(a.validate().unwrap_err()).contains("contactInfo.email"));

    let patch = AdPatch { price: Some(-5.0), title: Some(" ".into()), ..Default::default() };
    let errors = field_errors(patch.validate().unwrap_err());
    assert!(errors.contains("price"));
    assert!(errors.contains("title"));
}
