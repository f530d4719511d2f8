//! Resource names, built-in role names and the role hierarchy

use std::collections::BTreeMap;

// Protected resources
pub const RESOURCE_USERS: &str = "users";
pub const RESOURCE_ROLES: &str = "roles";
pub const RESOURCE_ADS: &str = "ads";
pub const RESOURCE_ANALYTICS: &str = "analytics";

// Built-in role names (normalised form)
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_USER: &str = "user";
pub const ROLE_GUEST: &str = "guest";

// Role levels, highest first. Anything not listed sits at 0.
const HIERARCHY: &[(&str, u8)] = &[
    (ROLE_ADMIN, 3),
    (ROLE_MODERATOR, 2),
    (ROLE_USER, 1),
    (ROLE_GUEST, 0),
];

// Id prefixes for generated records
pub const USER_ID_PREFIX: &str = "user-";
pub const ROLE_ID_PREFIX: &str = "role-";
pub const AD_ID_PREFIX: &str = "ad-";

/// Number of users the admin dashboard lists as recent
pub const DASHBOARD_RECENT_USERS: usize = 5;

/// Canonical form of a role name for classification and hierarchy lookups
pub fn normalize_role_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Whether two role names refer to the same role after normalisation
pub fn same_role(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// The fixed role hierarchy as a name -> level map
pub fn role_hierarchy() -> BTreeMap<&'static str, u8> {
    HIERARCHY.iter().copied().collect()
}

/// Level of a role name; unknown roles are 0
pub fn role_level(name: &str) -> u8 {
    HIERARCHY
        .iter()
        .find(|(n, _)| same_role(n, name))
        .map(|(_, l)| *l)
        .unwrap_or(0)
}
