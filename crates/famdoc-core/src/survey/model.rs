//! Survey and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::Scoped;
use crate::answer::model::Answer;
use crate::family::model::FamilyRef;

/// A questionnaire made of data fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Fields in display order.
    #[serde(default)]
    pub data_field_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvey {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_field_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub data_field_ids: Option<Vec<String>>,
}

/// One filled-out survey about a family or child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub survey_id: String,
    pub user_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub family: Option<FamilyRef>,
    #[serde(default)]
    pub child_id: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Scoped for Response {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
    pub survey_id: String,
    #[serde(default)]
    pub family_id: Option<String>,
    #[serde(default)]
    pub child_id: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Wholesale replacement of a response's subject or answers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseUpdate {
    pub family_id: Option<String>,
    pub child_id: Option<String>,
    pub answers: Option<Vec<Answer>>,
}
