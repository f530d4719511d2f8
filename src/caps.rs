//! Fixed permission checks used by the marketplace's convenience predicates

use crate::constants::{RESOURCE_ADS, RESOURCE_ANALYTICS, RESOURCE_ROLES, RESOURCE_USERS};
use crate::models::{Action, PermissionCheck};

/// Named checks as constants
#[allow(non_snake_case)]
pub mod MarketCap {
    use super::*;

    // Administration
    pub const MANAGE_USERS: PermissionCheck =
        PermissionCheck::fixed(RESOURCE_USERS, Action::Manage);
    pub const MANAGE_ROLES: PermissionCheck =
        PermissionCheck::fixed(RESOURCE_ROLES, Action::Manage);

    // Ads
    pub const MANAGE_ADS: PermissionCheck = PermissionCheck::fixed(RESOURCE_ADS, Action::Manage);
    pub const READ_ADS: PermissionCheck = PermissionCheck::fixed(RESOURCE_ADS, Action::Read);
    pub const CREATE_ADS: PermissionCheck = PermissionCheck::fixed(RESOURCE_ADS, Action::Create);
    pub const EDIT_ADS: PermissionCheck = PermissionCheck::fixed(RESOURCE_ADS, Action::Update);
    pub const DELETE_ADS: PermissionCheck = PermissionCheck::fixed(RESOURCE_ADS, Action::Delete);

    // Reporting
    pub const VIEW_ANALYTICS: PermissionCheck =
        PermissionCheck::fixed(RESOURCE_ANALYTICS, Action::Read);
}

/// Render a list of checks as "action resource, action resource"
pub fn checks_to_string(checks: &[PermissionCheck]) -> String {
    checks
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
