//! Configuration route handlers. Admin only.

use axum::{
    extract::{Path, State},
    Json,
};
use famdoc_core::access::require_role;
use famdoc_core::configuration::{
    self,
    model::{ConfigurationUpdate, NewConfiguration},
};
use famdoc_core::user::model::Role;
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::session::Actor;
use crate::state::AppState;

#[instrument(skip_all, fields(endpoint = "/config", method = "GET"))]
pub async fn list_configs(State(state): State<AppState>, actor: Actor) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let configs = configuration::list_configurations(&state.db).await?;
    Ok(Json(json!({ "configs": configs })))
}

#[instrument(skip_all, fields(endpoint = "/config", method = "POST"))]
pub async fn create_config(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewConfiguration>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let config = configuration::create_configuration(&state.db, new).await?;
    Ok(Json(json!({ "config": config })))
}

#[instrument(skip_all, fields(endpoint = "/config/{id}", method = "GET"))]
pub async fn get_config(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let config = configuration::get_configuration(&state.db, &id).await?;
    Ok(Json(json!({ "config": config })))
}

#[instrument(skip_all, fields(endpoint = "/config/{id}", method = "POST"))]
pub async fn update_config(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ConfigurationUpdate>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let config = configuration::update_configuration(&state.db, &id, update).await?;
    Ok(Json(json!({ "config": config })))
}

#[instrument(skip_all, fields(endpoint = "/config/{id}", method = "DELETE"))]
pub async fn delete_config(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let config = configuration::delete_configuration(&state.db, &id).await?;
    Ok(Json(json!({ "config": config })))
}
