//! User route handlers, including invitations and admin bootstrap.

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use famdoc_core::access::{effective_organization, ensure_access};
use famdoc_core::auth::{self, model::SignUpOutcome, ADMIN_ROLE_CLAIM};
use famdoc_core::user::{
    self,
    model::{NewUser, Role, UserFilter, UserUpdate},
};
use famdoc_core::DocError;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::extract::{query_pairs, ApiJson};
use crate::mailer;
use crate::session::{Actor, SessionIdentity};
use crate::state::AppState;

/// Plain users may not manage other users.
fn ensure_manager(actor: &Actor) -> ApiResult<()> {
    if actor.user.role == Role::User {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[instrument(skip_all, fields(endpoint = "/user", method = "GET"))]
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Value>> {
    ensure_manager(&actor)?;
    let pairs = query_pairs(query.as_deref());
    let mut filter = UserFilter::from_query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if actor.user.role == Role::OrgController {
        filter.organization_id = actor.user.organization_id.clone();
    }
    let users = user::list_users(&state.db, &filter).await?;
    Ok(Json(json!({ "users": users })))
}

/// `POST /api/user`: sign up the email, create the user, then mail an
/// invitation link. An identity left over from a deleted user is reused.
/// Nothing is rolled back if a later step fails.
#[instrument(skip_all, fields(endpoint = "/user", method = "POST"))]
pub async fn invite_user(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewUser>,
) -> ApiResult<Json<Value>> {
    ensure_manager(&actor)?;
    if let Some(role) = new.role {
        user::ensure_can_assign_role(&actor.user, role)?;
    }

    let identity = match auth::sign_up(&state.db, &new.email).await? {
        SignUpOutcome::Created(identity) => identity,
        SignUpOutcome::EmailAlreadyExists => user::unclaimed_identity(&state.db, &new.email)
            .await?
            .ok_or(ApiError::EmailAlreadyExists)?,
    };

    let organization_id = effective_organization(&actor.user, new.organization_id.clone());
    let new = NewUser {
        email: identity.email.clone(),
        ..new
    };
    let created = user::create_user(&state.db, &identity.auth_id, new, organization_id).await?;

    let token = auth::create_reset_password_token(&state.db, &identity.auth_id).await?;
    let link = auth::invite_link(&state.app_url, &token);
    state
        .mailer
        .send(&mailer::invitation(&identity.email, &link))
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %created.id, "invitation email failed");
            ApiError::Internal
        })?;

    info!(user_id = %created.id, invited_by = %actor.user.id, "user invited");
    let created = user::get_user(&state.db, &created.id).await?;
    Ok(Json(json!({ "user": created })))
}

#[instrument(skip_all, fields(endpoint = "/user/me", method = "GET"))]
pub async fn me(State(state): State<AppState>, actor: Actor) -> ApiResult<Json<Value>> {
    let me = user::get_user(&state.db, &actor.user.id).await?;
    Ok(Json(json!({ "user": me })))
}

/// `POST /api/user/createAdminUser`: an ADMIN user for the session's own
/// identity. Requires the `admin` role claim.
#[instrument(skip_all, fields(endpoint = "/user/createAdminUser", method = "POST"))]
pub async fn create_admin_user(
    State(state): State<AppState>,
    SessionIdentity(session): SessionIdentity,
) -> ApiResult<Json<Value>> {
    if !session.has_role(ADMIN_ROLE_CLAIM) {
        return Err(ApiError::Forbidden);
    }
    let identity = auth::get_identity(&state.db, &session.auth_id)
        .await?
        .ok_or_else(|| DocError::UnknownUser(session.auth_id.clone()))?;

    let new = NewUser {
        email: identity.email,
        name: None,
        role: Some(Role::Admin),
        organization_id: None,
    };
    let admin = user::create_user(&state.db, &identity.auth_id, new, None).await?;
    info!(user_id = %admin.id, "admin user created");
    Ok(Json(json!({ "user": admin })))
}

#[instrument(skip_all, fields(endpoint = "/user/{id}", method = "GET"))]
pub async fn get_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let found = user::get_user(&state.db, &id).await?;
    ensure_access(&actor.user, &found)?;
    Ok(Json(json!({ "user": found })))
}

#[instrument(skip_all, fields(endpoint = "/user/{id}", method = "POST"))]
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> ApiResult<Json<Value>> {
    let found = user::get_user(&state.db, &id).await?;
    ensure_access(&actor.user, &found)?;
    let updated = user::update_user(&state.db, &actor.user, &id, update).await?;
    Ok(Json(json!({ "user": updated })))
}

#[instrument(skip_all, fields(endpoint = "/user/{id}", method = "DELETE"))]
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let found = user::get_user(&state.db, &id).await?;
    ensure_access(&actor.user, &found)?;
    let deleted = user::delete_user(&state.db, &actor.user, &id).await?;
    Ok(Json(json!({ "user": deleted })))
}
