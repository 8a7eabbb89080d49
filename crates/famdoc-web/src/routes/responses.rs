//! Survey response route handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use famdoc_core::access::ensure_access;
use famdoc_core::answer::AnswerEdit;
use famdoc_core::survey::{
    self,
    model::{NewResponse, ResponseUpdate},
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::session::Actor;
use crate::state::AppState;

#[instrument(skip_all, fields(endpoint = "/responses", method = "POST"))]
pub async fn create_response(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewResponse>,
) -> ApiResult<Json<Value>> {
    let response = survey::create_response(&state.db, &actor.user, new).await?;
    Ok(Json(json!({ "response": response })))
}

#[instrument(skip_all, fields(endpoint = "/responses/{id}", method = "GET"))]
pub async fn get_response(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let response = survey::get_response(&state.db, &id).await?;
    ensure_access(&actor.user, &response)?;
    Ok(Json(json!({ "response": response })))
}

#[instrument(skip_all, fields(endpoint = "/responses/{id}", method = "POST"))]
pub async fn update_response(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ResponseUpdate>,
) -> ApiResult<Json<Value>> {
    let response = survey::get_response(&state.db, &id).await?;
    ensure_access(&actor.user, &response)?;
    let response = survey::update_response(&state.db, &actor.user, &id, update).await?;
    Ok(Json(json!({ "response": response })))
}

#[instrument(skip_all, fields(endpoint = "/responses/{id}", method = "DELETE"))]
pub async fn delete_response(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let response = survey::get_response(&state.db, &id).await?;
    ensure_access(&actor.user, &response)?;
    let response = survey::delete_response(&state.db, &id).await?;
    Ok(Json(json!({ "response": response })))
}

/// Apply one answer edit event, e.g. `{"kind": "bool", "value": true}`.
#[instrument(skip_all, fields(endpoint = "/responses/{id}/answers/{dataFieldId}", method = "POST"))]
pub async fn edit_answer(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, data_field_id)): Path<(String, String)>,
    ApiJson(edit): ApiJson<AnswerEdit>,
) -> ApiResult<Json<Value>> {
    let response = survey::get_response(&state.db, &id).await?;
    ensure_access(&actor.user, &response)?;
    let response = survey::edit_response_answer(&state.db, response, &data_field_id, &edit).await?;
    Ok(Json(json!({ "response": response })))
}
