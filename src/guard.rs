//! Access decisions for protected pages and endpoints

use serde::Serialize;

use crate::caps::checks_to_string;
use crate::constants::same_role;
use crate::error::{MarketError, Result};
use crate::models::{PermissionCheck, User};
use crate::permissions::Catalog;

pub const DEFAULT_FALLBACK: &str = "/";

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "access", rename_all = "camelCase")]
pub enum Access {
    Granted,
    /// No current user; send them to `to`
    Redirect { to: String },
    RoleDenied { required: String, actual: String },
    PermissionDenied { missing: Vec<PermissionCheck> },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Access::Granted => Ok(()),
            Access::Redirect { .. } => Err(MarketError::Unauthenticated),
            Access::RoleDenied { required, actual } => Err(MarketError::Forbidden(format!(
                "required role: {required} | your role: {actual}"
            ))),
            Access::PermissionDenied { missing } => Err(MarketError::Forbidden(format!(
                "required permissions: {}",
                checks_to_string(&missing)
            ))),
        }
    }
}

/// Requirements for reaching a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    pub required_permissions: Vec<PermissionCheck>,
    pub required_role: Option<String>,
    pub fallback_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            required_permissions: Vec::new(),
            required_role: None,
            fallback_path: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl RouteGuard {
    /// Any signed-in user
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn permissions(checks: impl IntoIterator<Item = PermissionCheck>) -> Self {
        Self { required_permissions: checks.into_iter().collect(), ..Self::default() }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self { required_role: Some(name.into()), ..Self::default() }
    }

    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }

    /// Authentication first, then role, then permissions
    pub fn check(&self, user: Option<&User>, catalog: &Catalog) -> Access {
        let Some(user) = user else {
            return Access::Redirect { to: self.fallback_path.clone() };
        };
        if let Some(required) = &self.required_role {
            if !same_role(&user.role, required) {
                return Access::RoleDenied {
                    required: required.clone(),
                    actual: user.role.clone(),
                };
            }
        }
        if !self.required_permissions.is_empty() {
            let missing = catalog.missing_permissions(user, &self.required_permissions);
            if !missing.is_empty() {
                return Access::PermissionDenied { missing };
            }
        }
        Access::Granted
    }
}
