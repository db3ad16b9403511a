//! Session Routes
//!
//! Role resolution and saved role preferences.
//!
//! - POST /api/v1/session/resolve-role - Resolve the active role
//! - PUT /api/v1/session/preference - Save a role preference
//! - DELETE /api/v1/session/preference/:user_id - Clear a saved preference

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ResolveRoleRequest, ResolveRoleResponse, SavePreferenceRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::session::{available_roles, resolve_active_role, Role};

/// POST /api/v1/session/resolve-role
///
/// Apply the role precedence rules to the supplied roles and membership.
/// Without an explicit `savedPreference`, the stored preference for
/// `userId` (if any) is used.
pub async fn resolve_role(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResolveRoleRequest>, JsonRejection>,
) -> ApiResult<Json<ResolveRoleResponse>> {
    let Json(req) = payload?;
    let roles = parse_roles(&req.roles);

    let saved = match (&req.saved_preference, &req.user_id) {
        (Some(saved), _) => Some(saved.clone()),
        (None, Some(user_id)) => state.preferences.load(user_id).await?,
        (None, None) => None,
    };

    let membership = req.membership.as_ref();
    let active_role = resolve_active_role(&roles, membership, saved.as_deref());

    Ok(Json(ResolveRoleResponse {
        active_role,
        available_roles: available_roles(&roles, membership),
    }))
}

/// PUT /api/v1/session/preference
///
/// Remember the role a user switched to.
pub async fn save_preference(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SavePreferenceRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    if req.user_id.trim().is_empty() {
        return Err(ApiError::Validation("userId cannot be empty".to_string()));
    }

    let role: Role = req.role.parse()?;
    state.preferences.save(&req.user_id, role).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/session/preference/:user_id
pub async fn clear_preference(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.preferences.clear(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Parse stored role names, skipping ones this service does not know
fn parse_roles(names: &[String]) -> Vec<Role> {
    names
        .iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                tracing::warn!(role = %name, "Ignoring unknown stored role");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles_skips_unknown() {
        let names = vec![
            "coach".to_string(),
            "moderator".to_string(),
            "admin".to_string(),
        ];
        assert_eq!(parse_roles(&names), vec![Role::Coach, Role::Admin]);
    }
}
