//! Survey route handlers: definitions, responses, table and CSV export.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use famdoc_core::access::require_role;
use famdoc_core::survey::{
    self,
    model::{NewSurvey, SurveyUpdate},
    tabulate::{export_filename, tabulate, Table},
};
use famdoc_core::user::model::Role;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::session::Actor;
use crate::state::AppState;

#[instrument(skip_all, fields(endpoint = "/surveys", method = "GET"))]
pub async fn list_surveys(State(state): State<AppState>, _actor: Actor) -> ApiResult<Json<Value>> {
    let surveys = survey::list_surveys(&state.db).await?;
    Ok(Json(json!({ "surveys": surveys })))
}

#[instrument(skip_all, fields(endpoint = "/surveys", method = "POST"))]
pub async fn create_survey(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewSurvey>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let created = survey::create_survey(&state.db, new).await?;
    Ok(Json(json!({ "survey": created })))
}

#[instrument(skip_all, fields(endpoint = "/surveys/{id}", method = "GET"))]
pub async fn get_survey(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let found = survey::get_survey(&state.db, &id).await?;
    Ok(Json(json!({ "survey": found })))
}

#[instrument(skip_all, fields(endpoint = "/surveys/{id}", method = "POST"))]
pub async fn update_survey(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<SurveyUpdate>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let updated = survey::update_survey(&state.db, &id, update).await?;
    Ok(Json(json!({ "survey": updated })))
}

#[instrument(skip_all, fields(endpoint = "/surveys/{id}", method = "DELETE"))]
pub async fn delete_survey(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&actor.user, Role::Admin)?;
    let deleted = survey::delete_survey(&state.db, &id).await?;
    Ok(Json(json!({ "survey": deleted })))
}

#[instrument(skip_all, fields(endpoint = "/surveys/{id}/responses", method = "GET"))]
pub async fn list_responses(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let found = survey::get_survey(&state.db, &id).await?;
    let responses = survey::list_responses(&state.db, &actor.user, &found.id).await?;
    Ok(Json(json!({ "responses": responses })))
}

async fn survey_table(state: &AppState, actor: &Actor, id: &str) -> ApiResult<(String, Table)> {
    let found = survey::get_survey(&state.db, id).await?;
    let fields = survey::survey_fields(&state.db, &found).await?;
    let responses = survey::list_responses(&state.db, &actor.user, &found.id).await?;
    Ok((found.name, tabulate(&fields, &responses)))
}

#[instrument(skip_all, fields(endpoint = "/surveys/{id}/table", method = "GET"))]
pub async fn get_table(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let (_, table) = survey_table(&state, &actor, &id).await?;
    Ok(Json(json!({ "table": table })))
}

/// CSV download of the survey table.
#[instrument(skip_all, fields(endpoint = "/surveys/{id}/export", method = "GET"))]
pub async fn export_csv(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (name, table) = survey_table(&state, &actor, &id).await?;
    let csv = table.to_csv()?;
    let filename = export_filename(&name, chrono::Local::now().naive_local());
    info!(survey_id = %id, rows = table.rows.len(), %filename, "exported survey");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        csv,
    ))
}
