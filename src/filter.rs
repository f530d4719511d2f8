//! Filtered, sorted views over in-memory collections
//!
//! [`apply`] never touches its source: it clones the matching elements into a
//! new vector and stable-sorts that. Each filter spec decides what "matches"
//! and how two elements compare; unset fields constrain nothing.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Ad, AdCategory, AdStatus, Role, User};

// ============================================================================
// Pipeline
// ============================================================================

/// A filter + sort specification over `T`
pub trait ViewSpec<T> {
    fn matches(&self, item: &T) -> bool;

    /// `None` leaves the filtered elements in input order
    fn compare(&self, a: &T, b: &T) -> Option<Ordering>;
}

/// Derive a filtered, ordered view of `items`
pub fn apply<T: Clone, S: ViewSpec<T> + ?Sized>(items: &[T], spec: &S) -> Vec<T> {
    let mut view: Vec<T> = items.iter().filter(|i| spec.matches(i)).cloned().collect();
    // Probe once so an unsorted spec skips the sort entirely
    if let [a, b, ..] = view.as_slice() {
        if spec.compare(a, b).is_none() {
            return view;
        }
    }
    view.sort_by(|a, b| spec.compare(a, b).unwrap_or(Ordering::Equal));
    view
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[inline]
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

// Empty search terms impose no constraint
fn needle(term: &Option<String>) -> Option<String> {
    term.as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSortKey {
    Name,
    Email,
    CreatedAt,
    LastLogin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserFilters {
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<UserSortKey>,
    pub sort_order: Option<SortOrder>,
}

impl ViewSpec<User> for UserFilters {
    fn matches(&self, u: &User) -> bool {
        if let Some(q) = needle(&self.search) {
            if !contains_ci(&u.name, &q) && !contains_ci(&u.email, &q) {
                return false;
            }
        }
        if let Some(role) = self.role.as_deref().filter(|r| !r.is_empty()) {
            if u.role != role {
                return false;
            }
        }
        if let Some(active) = self.is_active {
            if u.is_active != active {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &User, b: &User) -> Option<Ordering> {
        let ord = match self.sort_by? {
            UserSortKey::Name => cmp_ci(&a.name, &b.name),
            UserSortKey::Email => cmp_ci(&a.email, &b.email),
            UserSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            // None < Some: never logged in sorts as the earliest instant
            UserSortKey::LastLogin => a.last_login.cmp(&b.last_login),
        };
        Some(self.sort_order.unwrap_or_default().apply(ord))
    }
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSortKey {
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleFilters {
    pub search: Option<String>,
    pub is_default: Option<bool>,
    pub sort_by: Option<RoleSortKey>,
    pub sort_order: Option<SortOrder>,
}

impl ViewSpec<Role> for RoleFilters {
    fn matches(&self, r: &Role) -> bool {
        if let Some(q) = needle(&self.search) {
            if !contains_ci(&r.name, &q) && !contains_ci(&r.description, &q) {
                return false;
            }
        }
        if let Some(default) = self.is_default {
            if r.is_default != default {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &Role, b: &Role) -> Option<Ordering> {
        let ord = match self.sort_by? {
            RoleSortKey::Name => cmp_ci(&a.name, &b.name),
            RoleSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        Some(self.sort_order.unwrap_or_default().apply(ord))
    }
}

// ============================================================================
// Ads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdSortKey {
    Date,
    Price,
    Title,
    /// No scoring yet; keeps input order
    Relevance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdFilters {
    pub search: Option<String>,
    pub category: Option<AdCategory>,
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub status: Option<AdStatus>,
    pub user_id: Option<String>,
    pub sort_by: Option<AdSortKey>,
    pub sort_order: Option<SortOrder>,
}

impl AdFilters {
    /// Listing default: newest first
    pub fn newest_first() -> Self {
        Self {
            sort_by: Some(AdSortKey::Date),
            sort_order: Some(SortOrder::Desc),
            ..Self::default()
        }
    }

    /// Overwrite the fields set in `other`, keeping the rest
    pub fn merge(&mut self, other: AdFilters) {
        if other.search.is_some() {
            self.search = other.search;
        }
        if other.category.is_some() {
            self.category = other.category;
        }
        if other.location.is_some() {
            self.location = other.location;
        }
        if other.min_price.is_some() {
            self.min_price = other.min_price;
        }
        if other.max_price.is_some() {
            self.max_price = other.max_price;
        }
        if other.status.is_some() {
            self.status = other.status;
        }
        if other.user_id.is_some() {
            self.user_id = other.user_id;
        }
        if other.sort_by.is_some() {
            self.sort_by = other.sort_by;
        }
        if other.sort_order.is_some() {
            self.sort_order = other.sort_order;
        }
    }
}

impl ViewSpec<Ad> for AdFilters {
    fn matches(&self, ad: &Ad) -> bool {
        if let Some(q) = needle(&self.search) {
            if !contains_ci(&ad.title, &q) && !contains_ci(&ad.description, &q) {
                return false;
            }
        }
        if self.category.is_some_and(|c| ad.category != c) {
            return false;
        }
        if let Some(loc) = needle(&self.location) {
            if !contains_ci(&ad.location, &loc) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| ad.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| ad.price > max) {
            return false;
        }
        if self.status.is_some_and(|s| ad.status != s) {
            return false;
        }
        if let Some(owner) = self.user_id.as_deref() {
            if ad.user_id != owner {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &Ad, b: &Ad) -> Option<Ordering> {
        let ord = match self.sort_by? {
            AdSortKey::Date => a.created_at.cmp(&b.created_at),
            AdSortKey::Price => a.price.total_cmp(&b.price),
            AdSortKey::Title => cmp_ci(&a.title, &b.title),
            AdSortKey::Relevance => return None,
        };
        Some(self.sort_order.unwrap_or_default().apply(ord))
    }
}
