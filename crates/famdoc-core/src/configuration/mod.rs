//! Admin configuration records.

pub mod model;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{Configuration, ConfigurationUpdate, NewConfiguration};
use uuid::Uuid;

use crate::error::DocResult;

const COLLECTION: &str = "configuration";

pub async fn create_configuration(pool: &DbPool, new: NewConfiguration) -> DocResult<Configuration> {
    let config = Configuration {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        value: new.value,
        updated_at: Utc::now(),
    };
    records::put_record(pool, COLLECTION, &config.id, &config).await?;
    Ok(config)
}

pub async fn get_configuration(pool: &DbPool, id: &str) -> DocResult<Configuration> {
    Ok(records::require_record(pool, COLLECTION, id).await?)
}

pub async fn list_configurations(pool: &DbPool) -> DocResult<Vec<Configuration>> {
    Ok(records::list_records(pool, COLLECTION).await?)
}

pub async fn update_configuration(
    pool: &DbPool,
    id: &str,
    update: ConfigurationUpdate,
) -> DocResult<Configuration> {
    let mut config = get_configuration(pool, id).await?;
    if let Some(name) = update.name {
        config.name = name;
    }
    if let Some(value) = update.value {
        config.value = value;
    }
    config.updated_at = Utc::now();
    records::put_record(pool, COLLECTION, id, &config).await?;
    Ok(config)
}

pub async fn delete_configuration(pool: &DbPool, id: &str) -> DocResult<Configuration> {
    let config = get_configuration(pool, id).await?;
    records::delete_record(pool, COLLECTION, id).await?;
    Ok(config)
}
