//! Master data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::Scoped;
use crate::answer::model::Answer;

/// A kind of numbered record (e.g. a case file) and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub data_field_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMasterDataType {
    pub name: String,
    #[serde(default)]
    pub data_field_ids: Vec<String>,
}

/// One record of a master data type, numbered within its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterData {
    pub master_data_type_id: String,
    pub number: i64,
    pub created_by: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MasterData {
    /// Storage key, unique across types.
    pub fn key(&self) -> String {
        record_key(&self.master_data_type_id, self.number)
    }
}

pub fn record_key(master_data_type_id: &str, number: i64) -> String {
    format!("{}:{}", master_data_type_id, number)
}

impl Scoped for MasterData {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.created_by)
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataUpdate {
    pub answers: Option<Vec<Answer>>,
}
