//! Data field route handlers. Anyone signed in reads; admins change.

use axum::{
    extract::{Path, State},
    Json,
};
use famdoc_core::access::require_role;
use famdoc_core::data_field::{
    self,
    model::{DataFieldUpdate, NewDataField},
};
use famdoc_core::user::model::Role;
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::session::Actor;
use crate::state::AppState;

#[instrument(skip_all, fields(endpoint = "/dataFields", method = "GET"))]
pub async fn list_data_fields(State(state): State<AppState>, _actor: Actor) -> ApiResult<Json<Value>> {
    let fields = data_field::list_data_fields(&state.db).await?;
    Ok(Json(json!({ "dataFields": fields })))
}

#[instrument(skip_all, fields(endpoint = "/dataFields", method = "POST"))]
pub async fn create_data_field(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewDataField>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let field = data_field::create_data_field(&state.db, new).await?;
    Ok(Json(json!({ "dataField": field })))
}

#[instrument(skip_all, fields(endpoint = "/dataFields/{id}", method = "GET"))]
pub async fn get_data_field(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let field = data_field::get_data_field(&state.db, &id).await?;
    Ok(Json(json!({ "dataField": field })))
}

#[instrument(skip_all, fields(endpoint = "/dataFields/{id}", method = "POST"))]
pub async fn update_data_field(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<DataFieldUpdate>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let field = data_field::update_data_field(&state.db, &id, update).await?;
    Ok(Json(json!({ "dataField": field })))
}

#[instrument(skip_all, fields(endpoint = "/dataFields/{id}", method = "DELETE"))]
pub async fn delete_data_field(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let field = data_field::delete_data_field(&state.db, &id).await?;
    Ok(Json(json!({ "dataField": field })))
}
