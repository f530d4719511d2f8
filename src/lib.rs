//! makemyad - classified-ads marketplace core
//!
//! - [`permissions`]: role-based checks against an explicit [`Catalog`]
//! - [`filter`]: filtered, sorted views of users, roles and ads
//! - [`guard`]: access decisions for protected routes
//! - [`store`]: the in-memory [`Marketplace`] with CRUD and dashboard stats
//!
//! The HTTP API lives behind the `server` feature.

pub mod caps;
pub mod constants;
pub mod error;
pub mod filter;
pub mod forms;
pub mod guard;
pub mod ids;
pub mod models;
pub mod permissions;
pub mod seed;
pub mod store;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use caps::MarketCap;
pub use error::{FieldErrors, MarketError, Result};
pub use filter::{
    apply, AdFilters, AdSortKey, RoleFilters, RoleSortKey, SortOrder, UserFilters, UserSortKey,
    ViewSpec,
};
pub use forms::{AdPatch, NewAd, NewRole, NewUser, RolePatch, UserPatch};
pub use guard::{Access, RouteGuard};
pub use models::{
    Action, Ad, AdCategory, AdStatus, Category, ContactInfo, Permission, PermissionCheck, Role,
    User,
};
pub use permissions::{
    can_manage_user, has_higher_role, is_admin, is_moderator, is_user, role_hierarchy, Catalog,
    UserPermissions,
};
pub use store::{DashboardStats, Marketplace};
