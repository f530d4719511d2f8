//! Role-based permission evaluation
//!
//! A [`Catalog`] holds the configured roles and permissions and is passed to
//! every check explicitly. A user's capabilities come from the role whose name
//! equals `user.role`; a permission with action `manage` covers every action
//! on its resource. Missing roles, missing users and missing matches all
//! resolve to "denied".

use std::collections::BTreeMap;

use crate::caps::MarketCap;
use crate::constants::{self, ROLE_ADMIN, ROLE_MODERATOR, ROLE_USER};
use crate::models::{Permission, PermissionCheck, Role, User};

// ============================================================================
// Catalog
// ============================================================================

/// Configured roles and permissions. Setters replace the whole list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    roles: Vec<Role>,
    permissions: Vec<Permission>,
}

impl Catalog {
    pub fn new(roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        Self { roles, permissions }
    }

    pub fn set_roles(&mut self, roles: Vec<Role>) {
        self.roles = roles;
    }

    pub fn set_permissions(&mut self, permissions: Vec<Permission>) {
        self.permissions = permissions;
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub(crate) fn roles_mut(&mut self) -> &mut Vec<Role> {
        &mut self.roles
    }

    /// Role whose name equals `name` exactly
    pub fn find_role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn find_permission(&self, id: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.id == id)
    }

    // ------------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------------

    pub fn has_permission(&self, user: &User, check: &PermissionCheck) -> bool {
        let Some(role) = self.find_role(&user.role) else {
            tracing::debug!(user = %user.id, role = %user.role, "role not in catalog");
            return false;
        };
        let allowed = role
            .permissions
            .iter()
            .any(|p| p.resource == check.resource && p.action.satisfies(check.action));
        if !allowed {
            tracing::debug!(
                user = %user.id,
                role = %user.role,
                resource = %check.resource,
                action = %check.action,
                "permission denied"
            );
        }
        allowed
    }

    /// True if at least one check passes; false for an empty list
    pub fn has_any_permission(&self, user: &User, checks: &[PermissionCheck]) -> bool {
        checks.iter().any(|c| self.has_permission(user, c))
    }

    /// True if every check passes; true for an empty list
    pub fn has_all_permissions(&self, user: &User, checks: &[PermissionCheck]) -> bool {
        checks.iter().all(|c| self.has_permission(user, c))
    }

    /// Checks from `checks` the user does not pass, in input order
    pub fn missing_permissions(
        &self,
        user: &User,
        checks: &[PermissionCheck],
    ) -> Vec<PermissionCheck> {
        checks
            .iter()
            .filter(|c| !self.has_permission(user, c))
            .cloned()
            .collect()
    }

    /// Permissions of the user's role, empty if the role is unknown
    pub fn user_permissions(&self, user: &User) -> &[Permission] {
        self.find_role(&user.role)
            .map(|r| r.permissions.as_slice())
            .unwrap_or(&[])
    }

    pub fn can_manage_users(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::MANAGE_USERS)
    }

    pub fn can_manage_roles(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::MANAGE_ROLES)
    }

    pub fn can_manage_ads(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::MANAGE_ADS)
    }

    pub fn can_create_ads(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::CREATE_ADS)
    }

    pub fn can_edit_ads(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::EDIT_ADS)
    }

    pub fn can_delete_ads(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::DELETE_ADS)
    }

    pub fn can_view_analytics(&self, user: &User) -> bool {
        self.has_permission(user, &MarketCap::VIEW_ANALYTICS)
    }

    /// View of this catalog bound to a possibly-absent current user
    pub fn for_user<'a>(&'a self, user: Option<&'a User>) -> UserPermissions<'a> {
        UserPermissions { user, catalog: self }
    }
}

// ============================================================================
// Role classification & hierarchy
// ============================================================================

pub fn is_admin(user: &User) -> bool {
    constants::same_role(&user.role, ROLE_ADMIN)
}

pub fn is_moderator(user: &User) -> bool {
    constants::same_role(&user.role, ROLE_MODERATOR)
}

pub fn is_user(user: &User) -> bool {
    constants::same_role(&user.role, ROLE_USER)
}

/// admin=3, moderator=2, user=1, guest=0
pub fn role_hierarchy() -> BTreeMap<&'static str, u8> {
    constants::role_hierarchy()
}

/// Strictly higher level in the role hierarchy
pub fn has_higher_role(a: &User, b: &User) -> bool {
    constants::role_level(&a.role) > constants::role_level(&b.role)
}

/// Admins manage anyone, moderators manage plain users, everyone manages themselves
pub fn can_manage_user(manager: &User, target: &User) -> bool {
    if is_admin(manager) {
        return true;
    }
    if is_moderator(manager) {
        return is_user(target);
    }
    manager.id == target.id
}

// ============================================================================
// Bound view
// ============================================================================

/// Catalog checks for the current user. Everything is denied without a user.
#[derive(Debug, Clone, Copy)]
pub struct UserPermissions<'a> {
    user: Option<&'a User>,
    catalog: &'a Catalog,
}

impl<'a> UserPermissions<'a> {
    pub fn user(&self) -> Option<&'a User> {
        self.user
    }

    fn with<F: FnOnce(&'a User) -> bool>(&self, f: F) -> bool {
        self.user.map(f).unwrap_or(false)
    }

    pub fn has_permission(&self, check: &PermissionCheck) -> bool {
        self.with(|u| self.catalog.has_permission(u, check))
    }

    pub fn has_any_permission(&self, checks: &[PermissionCheck]) -> bool {
        self.with(|u| self.catalog.has_any_permission(u, checks))
    }

    /// Without a user this is false even for an empty list
    pub fn has_all_permissions(&self, checks: &[PermissionCheck]) -> bool {
        self.with(|u| self.catalog.has_all_permissions(u, checks))
    }

    pub fn user_permissions(&self) -> &'a [Permission] {
        match self.user {
            Some(u) => self.catalog.user_permissions(u),
            None => &[],
        }
    }

    pub fn can_manage_users(&self) -> bool {
        self.with(|u| self.catalog.can_manage_users(u))
    }

    pub fn can_manage_roles(&self) -> bool {
        self.with(|u| self.catalog.can_manage_roles(u))
    }

    pub fn can_manage_ads(&self) -> bool {
        self.with(|u| self.catalog.can_manage_ads(u))
    }

    pub fn can_create_ads(&self) -> bool {
        self.with(|u| self.catalog.can_create_ads(u))
    }

    pub fn can_edit_ads(&self) -> bool {
        self.with(|u| self.catalog.can_edit_ads(u))
    }

    pub fn can_delete_ads(&self) -> bool {
        self.with(|u| self.catalog.can_delete_ads(u))
    }

    pub fn can_view_analytics(&self) -> bool {
        self.with(|u| self.catalog.can_view_analytics(u))
    }

    pub fn is_admin(&self) -> bool {
        self.with(is_admin)
    }

    pub fn is_moderator(&self) -> bool {
        self.with(is_moderator)
    }

    pub fn is_user(&self) -> bool {
        self.with(is_user)
    }

    pub fn can_manage_user(&self, target: &User) -> bool {
        self.with(|u| can_manage_user(u, target))
    }
}
