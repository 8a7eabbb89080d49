//! Master data route handlers.

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use famdoc_core::access::{ensure_access, require_role};
use famdoc_core::answer::AnswerEdit;
use famdoc_core::master_data::{
    self,
    model::{MasterData, MasterDataUpdate, NewMasterDataType},
};
use famdoc_core::user::model::Role;
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::extract::{query_values, ApiJson};
use crate::session::Actor;
use crate::state::AppState;

#[instrument(skip_all, fields(endpoint = "/masterDataTypes", method = "GET"))]
pub async fn list_types(State(state): State<AppState>, _actor: Actor) -> ApiResult<Json<Value>> {
    let types = master_data::list_master_data_types(&state.db).await?;
    Ok(Json(json!({ "masterDataTypes": types })))
}

#[instrument(skip_all, fields(endpoint = "/masterDataTypes", method = "POST"))]
pub async fn create_type(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewMasterDataType>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let created = master_data::create_master_data_type(&state.db, new).await?;
    Ok(Json(json!({ "masterDataType": created })))
}

/// `GET /api/masterData/{typeId}?number=n`
#[instrument(skip_all, fields(endpoint = "/masterData/{typeId}", method = "GET"))]
pub async fn list_records(
    State(state): State<AppState>,
    actor: Actor,
    Path(type_id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Value>> {
    let mdt = master_data::get_master_data_type(&state.db, &type_id).await?;
    let numbers = query_values(query.as_deref(), "number");
    let records =
        master_data::list_master_data(&state.db, &actor.user, &mdt.id, numbers.first().map(String::as_str))
            .await?;
    Ok(Json(json!({ "masterData": records })))
}

#[instrument(skip_all, fields(endpoint = "/masterData/{typeId}", method = "POST"))]
pub async fn create_record(
    State(state): State<AppState>,
    actor: Actor,
    Path(type_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let created = master_data::create_master_data(&state.db, &actor.user, &type_id).await?;
    Ok(Json(json!({ "masterData": created })))
}

/// Load a record by its path segments and check access.
async fn load(state: &AppState, actor: &Actor, type_id: &str, number: &str) -> ApiResult<MasterData> {
    let number: i64 = number.parse().map_err(|_| ApiError::NotFound)?;
    let md = master_data::get_master_data(&state.db, type_id, number).await?;
    ensure_access(&actor.user, &md)?;
    Ok(md)
}

#[instrument(skip_all, fields(endpoint = "/masterData/{typeId}/{number}", method = "GET"))]
pub async fn get_record(
    State(state): State<AppState>,
    actor: Actor,
    Path((type_id, number)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let md = load(&state, &actor, &type_id, &number).await?;
    Ok(Json(json!({ "masterData": md })))
}

#[instrument(skip_all, fields(endpoint = "/masterData/{typeId}/{number}", method = "POST"))]
pub async fn update_record(
    State(state): State<AppState>,
    actor: Actor,
    Path((type_id, number)): Path<(String, String)>,
    ApiJson(update): ApiJson<MasterDataUpdate>,
) -> ApiResult<Json<Value>> {
    let md = load(&state, &actor, &type_id, &number).await?;
    let md = master_data::update_master_data(&state.db, md, update).await?;
    Ok(Json(json!({ "masterData": md })))
}

#[instrument(skip_all, fields(endpoint = "/masterData/{typeId}/{number}", method = "DELETE"))]
pub async fn delete_record(
    State(state): State<AppState>,
    actor: Actor,
    Path((type_id, number)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let md = load(&state, &actor, &type_id, &number).await?;
    let md = master_data::delete_master_data(&state.db, md).await?;
    Ok(Json(json!({ "masterData": md })))
}

#[instrument(
    skip_all,
    fields(endpoint = "/masterData/{typeId}/{number}/answers/{dataFieldId}", method = "POST")
)]
pub async fn edit_answer(
    State(state): State<AppState>,
    actor: Actor,
    Path((type_id, number, data_field_id)): Path<(String, String, String)>,
    ApiJson(edit): ApiJson<AnswerEdit>,
) -> ApiResult<Json<Value>> {
    let md = load(&state, &actor, &type_id, &number).await?;
    let md = master_data::edit_master_data_answer(&state.db, md, &data_field_id, &edit).await?;
    Ok(Json(json!({ "masterData": md })))
}
