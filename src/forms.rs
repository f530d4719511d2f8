//! Create/edit payloads and their validation
//!
//! Every failing field is reported at once, the way the admin and posting
//! forms show errors next to each input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldErrors, Result};
use crate::models::{AdCategory, AdStatus, ContactInfo};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("static regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_email(errors: &mut FieldErrors, field: &'static str, email: &str) {
    if blank(email) {
        errors.add(field, "Email is required");
    } else if !is_valid_email(email) {
        errors.add(field, "Email is invalid");
    }
}

fn check_price(errors: &mut FieldErrors, price: f64) {
    if !price.is_finite() || price < 0.0 {
        errors.add("price", "Price must be a non-negative number");
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub role: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if blank(&self.name) {
            errors.add("name", "Name is required");
        }
        check_email(&mut errors, "email", &self.email);
        if blank(&self.role) {
            errors.add("role", "Role is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.name.as_deref().is_some_and(blank) {
            errors.add("name", "Name is required");
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, "email", email);
        }
        if self.role.as_deref().is_some_and(blank) {
            errors.add("role", "Role is required");
        }
        errors.into_result()
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Role payload; permissions are given by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl NewRole {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if blank(&self.name) {
            errors.add("name", "Role name is required");
        }
        if blank(&self.description) {
            errors.add("description", "Description is required");
        }
        if self.permissions.is_empty() {
            errors.add("permissions", "At least one permission is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

impl RolePatch {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.name.as_deref().is_some_and(blank) {
            errors.add("name", "Role name is required");
        }
        if self.description.as_deref().is_some_and(blank) {
            errors.add("description", "Description is required");
        }
        if self.permissions.as_ref().is_some_and(Vec::is_empty) {
            errors.add("permissions", "At least one permission is required");
        }
        errors.into_result()
    }
}

// ============================================================================
// Ads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAd {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: AdCategory,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub contact_info: ContactInfo,
}

impl NewAd {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if blank(&self.title) {
            errors.add("title", "Title is required");
        }
        if blank(&self.description) {
            errors.add("description", "Description is required");
        }
        check_price(&mut errors, self.price);
        if blank(&self.location) {
            errors.add("location", "Location is required");
        }
        check_email(&mut errors, "contactInfo.email", &self.contact_info.email);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<AdCategory>,
    pub location: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<AdStatus>,
    pub contact_info: Option<ContactInfo>,
}

impl AdPatch {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.title.as_deref().is_some_and(blank) {
            errors.add("title", "Title is required");
        }
        if self.description.as_deref().is_some_and(blank) {
            errors.add("description", "Description is required");
        }
        if let Some(price) = self.price {
            check_price(&mut errors, price);
        }
        if self.location.as_deref().is_some_and(blank) {
            errors.add("location", "Location is required");
        }
        if let Some(contact) = &self.contact_info {
            check_email(&mut errors, "contactInfo.email", &contact.email);
        }
        errors.into_result()
    }
}
