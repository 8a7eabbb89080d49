//! Answer models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data_field::model::CollectionType;

/// Reference to a select option by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionRef {
    pub id: String,
}

impl OptionRef {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

/// Free-text override for an open select option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOtherValue {
    pub select_option_id: String,
    pub value: String,
}

/// A respondent's value for one data field.
///
/// Only the slot matching the field's collection type carries meaning.
/// Int and Num fields share `answer_num`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub data_field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_bool: Option<bool>,
    #[serde(default)]
    pub answer_select: Vec<OptionRef>,
    #[serde(default)]
    pub answer_select_other_values: Vec<SelectOtherValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_num: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_date: Option<DateTime<Utc>>,
}

/// One payload slot of an [`Answer`] together with its new content.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Bool(Option<bool>),
    Select(Vec<OptionRef>),
    SelectOtherValues(Vec<SelectOtherValue>),
    Text(Option<String>),
    Num(Option<f64>),
    Date(Option<DateTime<Utc>>),
}

/// Merge `slot` into `answer`, leaving every other slot as it was.
///
/// A missing previous answer starts from an empty one. The result is
/// always bound to `data_field_id`.
pub fn with_slot(answer: Option<&Answer>, data_field_id: &str, slot: Slot) -> Answer {
    let mut next = answer.cloned().unwrap_or_default();
    next.data_field_id = data_field_id.to_string();
    match slot {
        Slot::Bool(v) => next.answer_bool = v,
        Slot::Select(v) => next.answer_select = v,
        Slot::SelectOtherValues(v) => next.answer_select_other_values = v,
        Slot::Text(v) => next.answer_text = v,
        Slot::Num(v) => next.answer_num = v,
        Slot::Date(v) => next.answer_date = v,
    }
    next
}

/// Typed view of the meaningful slot.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue<'a> {
    Empty,
    Text(&'a str),
    Int(i64),
    Num(f64),
    Date(DateTime<Utc>),
    Bool(bool),
    Select {
        selected: &'a [OptionRef],
        other_values: &'a [SelectOtherValue],
    },
}

impl Answer {
    /// Read the slot that `collection_type` selects.
    pub fn value(&self, collection_type: CollectionType) -> AnswerValue<'_> {
        match collection_type {
            CollectionType::Text => self
                .answer_text
                .as_deref()
                .map_or(AnswerValue::Empty, AnswerValue::Text),
            CollectionType::Int => self
                .answer_num
                .map_or(AnswerValue::Empty, |n| AnswerValue::Int(n.trunc() as i64)),
            CollectionType::Num => self.answer_num.map_or(AnswerValue::Empty, AnswerValue::Num),
            CollectionType::Date => self.answer_date.map_or(AnswerValue::Empty, AnswerValue::Date),
            CollectionType::Bool => self.answer_bool.map_or(AnswerValue::Empty, AnswerValue::Bool),
            CollectionType::Select if self.answer_select.is_empty() => AnswerValue::Empty,
            CollectionType::Select => AnswerValue::Select {
                selected: &self.answer_select,
                other_values: &self.answer_select_other_values,
            },
        }
    }

    pub fn other_value(&self, option_id: &str) -> Option<&str> {
        self.answer_select_other_values
            .iter()
            .find(|o| o.select_option_id == option_id)
            .map(|o| o.value.as_str())
    }
}
