//! Data field registry.

pub mod model;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{DataField, DataFieldUpdate, NewDataField, SelectOption};
use tracing::{info, warn};
use uuid::Uuid;

use crate::answer::model::OptionRef;
use crate::error::{DocError, DocResult};

const COLLECTION: &str = "data_field";

/// Create a new data field. Option ids are generated here.
pub async fn create_data_field(pool: &DbPool, new: NewDataField) -> DocResult<DataField> {
    if new.name.trim().is_empty() {
        return Err(DocError::validation("data field name is empty"));
    }

    let select_options: Vec<SelectOption> = new
        .select_options
        .into_iter()
        .map(|o| SelectOption {
            id: Uuid::new_v4().to_string(),
            value: o.value,
            is_open: o.is_open,
            info: o.info,
        })
        .collect();

    let mut default_answer_select_options = Vec::new();
    for idx in new.default_options {
        let option = select_options
            .get(idx)
            .ok_or_else(|| DocError::validation(format!("default option {} out of range", idx)))?;
        default_answer_select_options.push(OptionRef::new(&option.id));
    }

    let field = DataField {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        description: new.description,
        collection_type: new.collection_type,
        select_options,
        default_answer_select_options,
        created_at: Utc::now(),
    };

    records::put_record(pool, COLLECTION, &field.id, &field).await?;
    info!(id = %field.id, collection_type = field.collection_type.as_str(), "created data field");
    Ok(field)
}

pub async fn get_data_field(pool: &DbPool, id: &str) -> DocResult<DataField> {
    Ok(records::require_record(pool, COLLECTION, id).await?)
}

pub async fn list_data_fields(pool: &DbPool) -> DocResult<Vec<DataField>> {
    Ok(records::list_records(pool, COLLECTION).await?)
}

pub async fn update_data_field(pool: &DbPool, id: &str, update: DataFieldUpdate) -> DocResult<DataField> {
    let mut field = get_data_field(pool, id).await?;
    if let Some(name) = update.name {
        field.name = name;
    }
    if let Some(description) = update.description {
        field.description = Some(description);
    }
    records::put_record(pool, COLLECTION, id, &field).await?;
    Ok(field)
}

pub async fn delete_data_field(pool: &DbPool, id: &str) -> DocResult<DataField> {
    let field = get_data_field(pool, id).await?;
    records::delete_record(pool, COLLECTION, id).await?;
    Ok(field)
}

/// Resolve ids to fields in the given order. Missing fields are skipped.
pub async fn resolve_data_fields(pool: &DbPool, ids: &[String]) -> DocResult<Vec<DataField>> {
    let mut fields = Vec::with_capacity(ids.len());
    for id in ids {
        match records::get_record::<DataField>(pool, COLLECTION, id).await? {
            Some(field) => fields.push(field),
            None => warn!(id = %id, "referenced data field no longer exists"),
        }
    }
    Ok(fields)
}
