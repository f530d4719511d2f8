//! Marketplace HTTP API
//!
//! The caller is identified by the `X-User-Id` header; no header, or an id
//! that matches no user, means unauthenticated. Every response uses the
//! `{ success, data, error }` envelope.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::caps::MarketCap;
use crate::constants::{self, ROLE_ADMIN, DASHBOARD_RECENT_USERS};
use crate::error::MarketError;
use crate::filter::{self, AdFilters, RoleFilters, UserFilters};
use crate::forms::{AdPatch, NewAd, NewRole, NewUser, RolePatch, UserPatch};
use crate::guard::RouteGuard;
use crate::models::{Ad, Category, Permission, Role, User};
use crate::permissions::{self, can_manage_user};
use crate::store::{DashboardStats, Marketplace};

pub const USER_HEADER: &str = "x-user-id";

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    market: Arc<RwLock<Marketplace>>,
}

impl AppState {
    pub fn new(market: Marketplace) -> Self {
        Self { market: Arc::new(RwLock::new(market)) }
    }

    fn read(&self) -> RwLockReadGuard<'_, Marketplace> {
        self.market.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Marketplace> {
        self.market.write().unwrap_or_else(|p| p.into_inner())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data: Some(data), error: None })
    }
}

impl ApiResponse<()> {
    fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionSummary {
    role: String,
    level: u8,
    permissions: Vec<Permission>,
    is_admin: bool,
    is_moderator: bool,
    can_manage_users: bool,
    can_manage_roles: bool,
    can_manage_ads: bool,
    can_create_ads: bool,
    can_edit_ads: bool,
    can_delete_ads: bool,
    can_view_analytics: bool,
}

pub struct ApiError(MarketError);

impl From<MarketError> for ApiError {
    fn from(e: MarketError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MarketError::Unauthenticated => StatusCode::UNAUTHORIZED,
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketError::RoleInUse { .. } => StatusCode::CONFLICT,
            MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarketError::Validation(_)
            | MarketError::UnknownRole(_)
            | MarketError::DuplicateRole(_)
            | MarketError::InvalidAction(_)
            | MarketError::InvalidPermission(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ApiResponse::err(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Helpers
// ============================================================================

fn current_user<'a>(headers: &HeaderMap, m: &'a Marketplace) -> Option<&'a User> {
    let id = headers.get(USER_HEADER)?.to_str().ok()?;
    m.user(id.trim())
}

/// Run `guard` for the caller and return them
fn authorize(headers: &HeaderMap, m: &Marketplace, guard: &RouteGuard) -> Result<User, ApiError> {
    let user = current_user(headers, m);
    guard.check(user, m.catalog()).into_result()?;
    user.cloned().ok_or(ApiError(MarketError::Unauthenticated))
}

fn forbidden(msg: &str) -> ApiError {
    ApiError(MarketError::Forbidden(msg.to_string()))
}

// ============================================================================
// Public handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::ok(state.read().categories().to_vec()))
}

async fn list_ads(
    State(state): State<AppState>,
    Query(query): Query<AdFilters>,
) -> ApiResult<Vec<Ad>> {
    let mut filters = AdFilters::newest_first();
    filters.merge(query);
    Ok(ApiResponse::ok(filter::apply(state.read().ads(), &filters)))
}

async fn role_hierarchy() -> ApiResult<BTreeMap<&'static str, u8>> {
    Ok(ApiResponse::ok(permissions::role_hierarchy()))
}

async fn get_ad(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Ad> {
    let m = state.read();
    let ad = m.ad(&id).cloned().ok_or_else(|| MarketError::not_found("ad", &id))?;
    Ok(ApiResponse::ok(ad))
}

// ============================================================================
// Ad posting
// ============================================================================

async fn create_ad(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewAd>,
) -> ApiResult<Ad> {
    let mut m = state.write();
    let user = authorize(&headers, &m, &RouteGuard::permissions([MarketCap::CREATE_ADS]))?;
    Ok(ApiResponse::ok(m.create_ad(&user, req)?))
}

async fn update_ad(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<AdPatch>,
) -> ApiResult<Ad> {
    let mut m = state.write();
    let user = authorize(&headers, &m, &RouteGuard::authenticated())?;
    let ad = m.ad(&id).ok_or_else(|| MarketError::not_found("ad", &id))?;
    if ad.user_id != user.id && !m.catalog().can_edit_ads(&user) {
        return Err(forbidden("only the owner or an ad editor may change this ad"));
    }
    Ok(ApiResponse::ok(m.update_ad(&id, req)?))
}

async fn delete_ad(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Ad> {
    let mut m = state.write();
    let user = authorize(&headers, &m, &RouteGuard::authenticated())?;
    let ad = m.ad(&id).ok_or_else(|| MarketError::not_found("ad", &id))?;
    if ad.user_id != user.id && !m.catalog().can_delete_ads(&user) {
        return Err(forbidden("only the owner or an ad moderator may delete this ad"));
    }
    Ok(ApiResponse::ok(m.delete_ad(&id)?))
}

// ============================================================================
// Current user
// ============================================================================

async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<User> {
    let m = state.read();
    Ok(ApiResponse::ok(authorize(&headers, &m, &RouteGuard::authenticated())?))
}

async fn my_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<PermissionSummary> {
    let m = state.read();
    let user = authorize(&headers, &m, &RouteGuard::authenticated())?;
    let perms = m.catalog().for_user(Some(&user));
    Ok(ApiResponse::ok(PermissionSummary {
        role: user.role.clone(),
        level: constants::role_level(&user.role),
        permissions: perms.user_permissions().to_vec(),
        is_admin: perms.is_admin(),
        is_moderator: perms.is_moderator(),
        can_manage_users: perms.can_manage_users(),
        can_manage_roles: perms.can_manage_roles(),
        can_manage_ads: perms.can_manage_ads(),
        can_create_ads: perms.can_create_ads(),
        can_edit_ads: perms.can_edit_ads(),
        can_delete_ads: perms.can_delete_ads(),
        can_view_analytics: perms.can_view_analytics(),
    }))
}

/// Self-service profile edit. Role and active flag stay with user managers.
async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UserPatch>,
) -> ApiResult<User> {
    let mut m = state.write();
    let me = authorize(&headers, &m, &RouteGuard::authenticated())?;
    if !can_manage_user(&me, &me) {
        return Err(forbidden("you may not edit this account"));
    }
    if req.role.is_some() || req.is_active.is_some() {
        return Err(forbidden("role and active status are changed by user managers"));
    }
    Ok(ApiResponse::ok(m.update_user(&me.id, req)?))
}

// ============================================================================
// Admin: dashboard & users
// ============================================================================

async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<DashboardStats> {
    let m = state.read();
    authorize(&headers, &m, &RouteGuard::role(ROLE_ADMIN))?;
    Ok(ApiResponse::ok(m.dashboard(DASHBOARD_RECENT_USERS)))
}

async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filters): Query<UserFilters>,
) -> ApiResult<Vec<User>> {
    let m = state.read();
    authorize(&headers, &m, &RouteGuard::permissions([MarketCap::MANAGE_USERS]))?;
    Ok(ApiResponse::ok(filter::apply(m.users(), &filters)))
}

async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewUser>,
) -> ApiResult<User> {
    let mut m = state.write();
    authorize(&headers, &m, &RouteGuard::permissions([MarketCap::MANAGE_USERS]))?;
    Ok(ApiResponse::ok(m.create_user(req)?))
}

fn manageable_target(m: &Marketplace, manager: &User, id: &str) -> Result<(), ApiError> {
    let target = m.user(id).ok_or_else(|| MarketError::not_found("user", id))?;
    if !can_manage_user(manager, target) {
        return Err(forbidden("target user outranks or equals your role"));
    }
    Ok(())
}

async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UserPatch>,
) -> ApiResult<User> {
    let mut m = state.write();
    let manager = authorize(&headers, &m, &RouteGuard::permissions([MarketCap::MANAGE_USERS]))?;
    manageable_target(&m, &manager, &id)?;
    Ok(ApiResponse::ok(m.update_user(&id, req)?))
}

async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let mut m = state.write();
    let manager = authorize(&headers, &m, &RouteGuard::permissions([MarketCap::MANAGE_USERS]))?;
    manageable_target(&m, &manager, &id)?;
    Ok(ApiResponse::ok(m.delete_user(&id)?))
}

// ============================================================================
// Admin: roles
// ============================================================================

fn role_admin() -> RouteGuard {
    RouteGuard::permissions([MarketCap::MANAGE_ROLES])
}

async fn list_roles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filters): Query<RoleFilters>,
) -> ApiResult<Vec<Role>> {
    let m = state.read();
    authorize(&headers, &m, &role_admin())?;
    Ok(ApiResponse::ok(filter::apply(m.roles(), &filters)))
}

async fn list_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<Permission>> {
    let m = state.read();
    authorize(&headers, &m, &role_admin())?;
    Ok(ApiResponse::ok(m.permissions().to_vec()))
}

async fn create_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewRole>,
) -> ApiResult<Role> {
    let mut m = state.write();
    authorize(&headers, &m, &role_admin())?;
    Ok(ApiResponse::ok(m.create_role(req)?))
}

async fn update_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<RolePatch>,
) -> ApiResult<Role> {
    let mut m = state.write();
    authorize(&headers, &m, &role_admin())?;
    Ok(ApiResponse::ok(m.update_role(&id, req)?))
}

async fn delete_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Role> {
    let mut m = state.write();
    authorize(&headers, &m, &role_admin())?;
    Ok(ApiResponse::ok(m.delete_role(&id)?))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route("/roles/hierarchy", get(role_hierarchy))
        .route("/ads", get(list_ads).post(create_ad))
        .route("/ads/:id", get(get_ad).put(update_ad).delete(delete_ad))
        .route("/me", get(me).put(update_me))
        .route("/me/permissions", get(my_permissions))
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:id", put(update_user).delete(delete_user))
        .route("/admin/roles", get(list_roles).post(create_role))
        .route("/admin/roles/:id", put(update_role).delete(delete_role))
        .route("/admin/permissions", get(list_permissions))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let status = |e: MarketError| ApiError(e).into_response().status();
        assert_eq!(status(MarketError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status(MarketError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(status(MarketError::not_found("ad", "9")), StatusCode::NOT_FOUND);
        assert_eq!(status(MarketError::UnknownRole("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(MarketError::Internal("random source unavailable".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
