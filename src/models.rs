//! Marketplace data model
//!
//! Records cross the wire in camelCase, the shape the listing and admin
//! front ends consume. Users reference their role by name, not by id.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

// ============================================================================
// Permissions
// ============================================================================

/// What a permission allows on its resource. `Manage` satisfies every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Manage,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Manage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }

    /// Whether a permission granting `self` covers a request for `wanted`
    #[inline]
    pub fn satisfies(self, wanted: Action) -> bool {
        self == wanted || self == Action::Manage
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| MarketError::InvalidAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub description: String,
    pub resource: String,
    pub action: Action,
}

/// A single capability question: may the user perform `action` on `resource`?
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub resource: Cow<'static, str>,
    pub action: Action,
}

impl PermissionCheck {
    pub fn new(resource: impl Into<Cow<'static, str>>, action: Action) -> Self {
        Self { resource: resource.into(), action }
    }

    /// Check against a resource name known at compile time
    pub const fn fixed(resource: &'static str, action: Action) -> Self {
        Self { resource: Cow::Borrowed(resource), action }
    }
}

impl fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.resource)
    }
}

// ============================================================================
// Users & Roles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Name of the assigned role
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

// ============================================================================
// Ads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdCategory {
    Electronics,
    Vehicles,
    Property,
    Furniture,
    Fashion,
    Tools,
}

impl AdCategory {
    pub const ALL: [AdCategory; 6] = [
        AdCategory::Electronics,
        AdCategory::Vehicles,
        AdCategory::Property,
        AdCategory::Furniture,
        AdCategory::Fashion,
        AdCategory::Tools,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdCategory::Electronics => "Electronics",
            AdCategory::Vehicles => "Vehicles",
            AdCategory::Property => "Property",
            AdCategory::Furniture => "Furniture",
            AdCategory::Fashion => "Fashion",
            AdCategory::Tools => "Tools",
        }
    }
}

impl fmt::Display for AdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    #[default]
    Active,
    Sold,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: AdCategory,
    pub location: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
    pub status: AdStatus,
    pub contact_info: ContactInfo,
}

/// Browse taxonomy entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<String>,
}
