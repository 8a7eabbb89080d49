//! Family route handlers.

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use famdoc_core::access::ensure_access;
use famdoc_core::family::{
    self,
    model::{FamilyUpdate, NewFamily},
    search::range_from_params,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::error::ApiResult;
use crate::extract::{query_values, ApiJson};
use crate::session::Actor;
use crate::state::AppState;

/// `GET /api/families?number=a&number=b`: families in the range visible to
/// the actor. Malformed numbers are ignored.
#[instrument(skip_all, fields(endpoint = "/families", method = "GET"))]
pub async fn list_families(
    State(state): State<AppState>,
    actor: Actor,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Value>> {
    let range = range_from_params(&query_values(query.as_deref(), "number"));
    debug!(?range, user_id = %actor.user.id, "listing families");
    let families = family::list_families(&state.db, &actor.user, range).await?;
    Ok(Json(json!({ "families": families })))
}

#[instrument(skip_all, fields(endpoint = "/families", method = "POST"))]
pub async fn create_family(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(new): ApiJson<NewFamily>,
) -> ApiResult<Json<Value>> {
    let family = family::create_family(&state.db, &actor.user, new).await?;
    Ok(Json(json!({ "family": family })))
}

#[instrument(skip_all, fields(endpoint = "/families/{id}", method = "GET"))]
pub async fn get_family(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let family = family::get_family(&state.db, &id).await?;
    ensure_access(&actor.user, &family)?;
    Ok(Json(json!({ "family": family })))
}

#[instrument(skip_all, fields(endpoint = "/families/{id}", method = "POST"))]
pub async fn update_family(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<FamilyUpdate>,
) -> ApiResult<Json<Value>> {
    let family = family::get_family(&state.db, &id).await?;
    ensure_access(&actor.user, &family)?;
    let family = family::update_family(&state.db, &id, update).await?;
    Ok(Json(json!({ "family": family })))
}

#[instrument(skip_all, fields(endpoint = "/families/{id}", method = "DELETE"))]
pub async fn delete_family(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let family = family::get_family(&state.db, &id).await?;
    ensure_access(&actor.user, &family)?;
    let family = family::delete_family(&state.db, &id).await?;
    info!(id = %family.id, user_id = %actor.user.id, "family deleted");
    Ok(Json(json!({ "family": family })))
}
