//! In-memory marketplace state
//!
//! Owns the user, ad and category collections plus the role/permission
//! [`Catalog`]. Role mutations go straight into the catalog, so permission
//! checks always see the latest write.
//!
//! Referential rules for roles (users point at roles by name):
//! - a user's role must name an existing role on create/update
//! - role names are unique, compared case-insensitively
//! - renaming a role renames it on every assigned user
//! - a role cannot be deleted while any user is assigned to it

use chrono::Utc;
use serde::Serialize;

use crate::constants::{same_role, AD_ID_PREFIX, ROLE_ID_PREFIX, USER_ID_PREFIX};
use crate::error::{MarketError, Result};
use crate::filter::{self, AdFilters, RoleFilters, UserFilters};
use crate::forms::{AdPatch, NewAd, NewRole, NewUser, RolePatch, UserPatch};
use crate::ids::generate_id;
use crate::models::{Ad, AdStatus, Category, Permission, Role, User};
use crate::permissions::Catalog;

/// Counts and recent sign-ups for the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_roles: usize,
    pub default_roles: usize,
    pub recent_users: Vec<User>,
}

#[derive(Debug, Clone)]
pub struct Marketplace {
    users: Vec<User>,
    ads: Vec<Ad>,
    categories: Vec<Category>,
    catalog: Catalog,
    user_filters: UserFilters,
    role_filters: RoleFilters,
    ad_filters: AdFilters,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            ads: Vec::new(),
            categories: Vec::new(),
            catalog: Catalog::default(),
            user_filters: UserFilters::default(),
            role_filters: RoleFilters::default(),
            ad_filters: AdFilters::newest_first(),
        }
    }
}

impl Marketplace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all collections at once, as after a data load
    pub fn load(
        &mut self,
        users: Vec<User>,
        roles: Vec<Role>,
        permissions: Vec<Permission>,
        ads: Vec<Ad>,
        categories: Vec<Category>,
    ) {
        tracing::info!(
            users = users.len(),
            roles = roles.len(),
            permissions = permissions.len(),
            ads = ads.len(),
            "marketplace loaded"
        );
        self.users = users;
        self.catalog.set_roles(roles);
        self.catalog.set_permissions(permissions);
        self.ads = ads;
        self.categories = categories;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn user_index(&self, id: &str) -> Result<usize> {
        self.users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| MarketError::not_found("user", id))
    }

    fn require_role(&self, name: &str) -> Result<()> {
        match self.catalog.find_role(name) {
            Some(_) => Ok(()),
            None => Err(MarketError::UnknownRole(name.to_string())),
        }
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<User> {
        new.validate()?;
        self.require_role(&new.role)?;
        let user = User {
            id: generate_id(USER_ID_PREFIX)?,
            name: new.name,
            email: new.email,
            phone: new.phone,
            location: new.location,
            role: new.role,
            is_active: new.is_active,
            created_at: Utc::now(),
            last_login: None,
        };
        tracing::info!(user = %user.id, role = %user.role, "user created");
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn update_user(&mut self, id: &str, patch: UserPatch) -> Result<User> {
        patch.validate()?;
        let idx = self.user_index(id)?;
        if let Some(role) = &patch.role {
            self.require_role(role)?;
        }
        let user = &mut self.users[idx];
        if let Some(v) = patch.name {
            user.name = v;
        }
        if let Some(v) = patch.email {
            user.email = v;
        }
        if let Some(v) = patch.phone {
            user.phone = Some(v);
        }
        if let Some(v) = patch.location {
            user.location = Some(v);
        }
        if let Some(v) = patch.role {
            user.role = v;
        }
        if let Some(v) = patch.is_active {
            user.is_active = v;
        }
        tracing::info!(user = %id, "user updated");
        Ok(user.clone())
    }

    pub fn delete_user(&mut self, id: &str) -> Result<User> {
        let idx = self.user_index(id)?;
        let user = self.users.remove(idx);
        tracing::info!(user = %id, "user deleted");
        Ok(user)
    }

    // ========================================================================
    // Roles
    // ========================================================================

    pub fn roles(&self) -> &[Role] {
        self.catalog.roles()
    }

    pub fn permissions(&self) -> &[Permission] {
        self.catalog.permissions()
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.catalog.roles().iter().find(|r| r.id == id)
    }

    fn role_index(&self, id: &str) -> Result<usize> {
        self.catalog
            .roles()
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| MarketError::not_found("role", id))
    }

    fn resolve_permissions(&self, ids: &[String]) -> Result<Vec<Permission>> {
        ids.iter()
            .map(|id| {
                self.catalog
                    .find_permission(id)
                    .cloned()
                    .ok_or_else(|| MarketError::InvalidPermission(id.clone()))
            })
            .collect()
    }

    // `except` is the role being renamed, if any
    fn ensure_unique_name(&self, name: &str, except: Option<&str>) -> Result<()> {
        let taken = self
            .catalog
            .roles()
            .iter()
            .any(|r| Some(r.id.as_str()) != except && same_role(&r.name, name));
        if taken {
            return Err(MarketError::DuplicateRole(name.to_string()));
        }
        Ok(())
    }

    fn assigned_users(&self, role_name: &str) -> Vec<String> {
        self.users
            .iter()
            .filter(|u| u.role == role_name)
            .map(|u| u.id.clone())
            .collect()
    }

    pub fn create_role(&mut self, new: NewRole) -> Result<Role> {
        new.validate()?;
        self.ensure_unique_name(&new.name, None)?;
        let permissions = self.resolve_permissions(&new.permissions)?;
        let role = Role {
            id: generate_id(ROLE_ID_PREFIX)?,
            name: new.name,
            description: new.description,
            permissions,
            is_default: new.is_default,
            created_at: Utc::now(),
        };
        tracing::info!(role = %role.id, name = %role.name, "role created");
        self.catalog.roles_mut().push(role.clone());
        Ok(role)
    }

    pub fn update_role(&mut self, id: &str, patch: RolePatch) -> Result<Role> {
        patch.validate()?;
        let idx = self.role_index(id)?;
        if let Some(name) = &patch.name {
            self.ensure_unique_name(name, Some(id))?;
        }
        let permissions = match &patch.permissions {
            Some(ids) => Some(self.resolve_permissions(ids)?),
            None => None,
        };

        let old_name = self.catalog.roles()[idx].name.clone();
        if let Some(new_name) = patch.name.as_ref().filter(|n| **n != old_name) {
            let mut renamed = 0usize;
            for user in self.users.iter_mut().filter(|u| u.role == old_name) {
                user.role = new_name.clone();
                renamed += 1;
            }
            tracing::info!(from = %old_name, to = %new_name, users = renamed, "role renamed");
        }

        let role = &mut self.catalog.roles_mut()[idx];
        if let Some(v) = patch.name {
            role.name = v;
        }
        if let Some(v) = patch.description {
            role.description = v;
        }
        if let Some(v) = permissions {
            role.permissions = v;
        }
        if let Some(v) = patch.is_default {
            role.is_default = v;
        }
        tracing::info!(role = %id, "role updated");
        Ok(role.clone())
    }

    /// Refused while any user is still assigned the role
    pub fn delete_role(&mut self, id: &str) -> Result<Role> {
        let idx = self.role_index(id)?;
        let name = self.catalog.roles()[idx].name.clone();
        let users = self.assigned_users(&name);
        if !users.is_empty() {
            tracing::warn!(role = %name, users = users.len(), "refusing to delete assigned role");
            return Err(MarketError::RoleInUse { role: name, users });
        }
        let role = self.catalog.roles_mut().remove(idx);
        tracing::info!(role = %id, "role deleted");
        Ok(role)
    }

    // ========================================================================
    // Ads
    // ========================================================================

    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    pub fn ad(&self, id: &str) -> Option<&Ad> {
        self.ads.iter().find(|a| a.id == id)
    }

    fn ad_index(&self, id: &str) -> Result<usize> {
        self.ads
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| MarketError::not_found("ad", id))
    }

    pub fn create_ad(&mut self, owner: &User, new: NewAd) -> Result<Ad> {
        new.validate()?;
        let now = Utc::now();
        let ad = Ad {
            id: generate_id(AD_ID_PREFIX)?,
            title: new.title,
            description: new.description,
            price: new.price,
            category: new.category,
            location: new.location,
            images: new.images,
            created_at: now,
            updated_at: now,
            user_id: owner.id.clone(),
            status: AdStatus::Active,
            contact_info: new.contact_info,
        };
        tracing::info!(ad = %ad.id, owner = %owner.id, "ad posted");
        self.ads.push(ad.clone());
        Ok(ad)
    }

    pub fn update_ad(&mut self, id: &str, patch: AdPatch) -> Result<Ad> {
        patch.validate()?;
        let idx = self.ad_index(id)?;
        let ad = &mut self.ads[idx];
        if let Some(v) = patch.title {
            ad.title = v;
        }
        if let Some(v) = patch.description {
            ad.description = v;
        }
        if let Some(v) = patch.price {
            ad.price = v;
        }
        if let Some(v) = patch.category {
            ad.category = v;
        }
        if let Some(v) = patch.location {
            ad.location = v;
        }
        if let Some(v) = patch.images {
            ad.images = v;
        }
        if let Some(v) = patch.status {
            ad.status = v;
        }
        if let Some(v) = patch.contact_info {
            ad.contact_info = v;
        }
        ad.updated_at = Utc::now();
        tracing::info!(ad = %id, "ad updated");
        Ok(ad.clone())
    }

    pub fn delete_ad(&mut self, id: &str) -> Result<Ad> {
        let idx = self.ad_index(id)?;
        let ad = self.ads.remove(idx);
        tracing::info!(ad = %id, "ad deleted");
        Ok(ad)
    }

    // ========================================================================
    // Filters & views
    // ========================================================================

    pub fn user_filters(&self) -> &UserFilters {
        &self.user_filters
    }

    /// Replace the current spec; fields left `None` stop constraining
    pub fn set_user_filters(&mut self, filters: UserFilters) {
        self.user_filters = filters;
    }

    pub fn clear_user_filters(&mut self) {
        self.user_filters = UserFilters::default();
    }

    pub fn user_view(&self) -> Vec<User> {
        filter::apply(&self.users, &self.user_filters)
    }

    pub fn role_filters(&self) -> &RoleFilters {
        &self.role_filters
    }

    pub fn set_role_filters(&mut self, filters: RoleFilters) {
        self.role_filters = filters;
    }

    pub fn clear_role_filters(&mut self) {
        self.role_filters = RoleFilters::default();
    }

    pub fn role_view(&self) -> Vec<Role> {
        filter::apply(self.catalog.roles(), &self.role_filters)
    }

    pub fn ad_filters(&self) -> &AdFilters {
        &self.ad_filters
    }

    pub fn set_ad_filters(&mut self, filters: AdFilters) {
        self.ad_filters = filters;
    }

    /// Back to the listing default (newest first, no constraints)
    pub fn clear_ad_filters(&mut self) {
        self.ad_filters = AdFilters::newest_first();
    }

    pub fn ad_view(&self) -> Vec<Ad> {
        filter::apply(&self.ads, &self.ad_filters)
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    pub fn dashboard(&self, recent: usize) -> DashboardStats {
        let mut recent_users = self.users.clone();
        recent_users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_users.truncate(recent);
        let roles = self.catalog.roles();
        DashboardStats {
            total_users: self.users.len(),
            active_users: self.users.iter().filter(|u| u.is_active).count(),
            total_roles: roles.len(),
            default_roles: roles.iter().filter(|r| r.is_default).count(),
            recent_users,
        }
    }
}
