//! Answer editing.
//!
//! Each edit takes the current answer (if any) and the field definition
//! and produces a fresh [`Answer`] with exactly one slot changed.

pub mod model;

use serde::Deserialize;

use crate::data_field::model::{parse_collection_value, CollectionType, CollectionValue, DataField};
use crate::error::{DocError, DocResult};
use model::{with_slot, Answer, OptionRef, SelectOtherValue, Slot};

/// An edit event as sent by the answer forms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AnswerEdit {
    /// Yes/no radio click.
    Bool { value: bool },
    /// Radio change on a select option.
    SelectOption { option_id: String },
    /// Click on a select option; clears the selection if it was checked.
    ToggleOption { option_id: String },
    /// Typing into the free-text box of an open option.
    OtherValue { option_id: String, value: String },
    /// Raw text for Text, Int, Num and Date fields.
    Value { raw: String },
}

/// Apply an edit event to the previous answer.
pub fn apply_edit(prev: Option<&Answer>, field: &DataField, edit: &AnswerEdit) -> DocResult<Answer> {
    match edit {
        AnswerEdit::Bool { value } => {
            expect_type(field, CollectionType::Bool)?;
            Ok(choose_bool(prev, field, *value))
        }
        AnswerEdit::SelectOption { option_id } => select_option(prev, field, option_id),
        AnswerEdit::ToggleOption { option_id } => toggle_option(prev, field, option_id),
        AnswerEdit::OtherValue { option_id, value } => update_other_value(prev, field, option_id, value),
        AnswerEdit::Value { raw } => set_raw_value(prev, field, raw),
    }
}

/// Choosing the value that is already set clears the slot.
pub fn choose_bool(prev: Option<&Answer>, field: &DataField, value: bool) -> Answer {
    let current = prev.and_then(|a| a.answer_bool);
    let next = if current == Some(value) { None } else { Some(value) };
    with_slot(prev, &field.id, Slot::Bool(next))
}

/// Whether an option shows as checked. Without an answer the field's
/// default options count as checked.
pub fn is_option_checked(prev: Option<&Answer>, field: &DataField, option_id: &str) -> bool {
    match prev {
        Some(answer) => answer.answer_select.iter().any(|o| o.id == option_id),
        None => field
            .default_answer_select_options
            .iter()
            .any(|o| o.id == option_id),
    }
}

/// Make `option_id` the single selected option.
pub fn select_option(prev: Option<&Answer>, field: &DataField, option_id: &str) -> DocResult<Answer> {
    expect_type(field, CollectionType::Select)?;
    expect_option(field, option_id)?;
    Ok(with_slot(prev, &field.id, Slot::Select(vec![OptionRef::new(option_id)])))
}

/// Select `option_id`, or clear the selection when it is already checked.
pub fn toggle_option(prev: Option<&Answer>, field: &DataField, option_id: &str) -> DocResult<Answer> {
    expect_type(field, CollectionType::Select)?;
    expect_option(field, option_id)?;
    if is_option_checked(prev, field, option_id) {
        Ok(with_slot(prev, &field.id, Slot::Select(Vec::new())))
    } else {
        Ok(with_slot(prev, &field.id, Slot::Select(vec![OptionRef::new(option_id)])))
    }
}

/// Set the free-text override of an open option. The matching entry is
/// replaced in place, or appended; other entries stay untouched.
pub fn update_other_value(
    prev: Option<&Answer>,
    field: &DataField,
    option_id: &str,
    value: &str,
) -> DocResult<Answer> {
    expect_type(field, CollectionType::Select)?;
    let option = expect_option(field, option_id)?;
    if !option.is_open {
        return Err(DocError::validation(format!("option {} takes no free text", option_id)));
    }

    let mut values: Vec<SelectOtherValue> = prev
        .map(|a| a.answer_select_other_values.clone())
        .unwrap_or_default();
    let entry = SelectOtherValue {
        select_option_id: option_id.to_string(),
        value: value.to_string(),
    };
    match values.iter().position(|v| v.select_option_id == option_id) {
        Some(idx) => values[idx] = entry,
        None => values.push(entry),
    }
    Ok(with_slot(prev, &field.id, Slot::SelectOtherValues(values)))
}

/// Set a Text, Int, Num or Date slot from raw input. Empty input clears it.
pub fn set_raw_value(prev: Option<&Answer>, field: &DataField, raw: &str) -> DocResult<Answer> {
    let parsed = parse_collection_value(field.collection_type, raw)?;
    let slot = match (field.collection_type, parsed) {
        (CollectionType::Text, v) => Slot::Text(v.and_then(|v| match v {
            CollectionValue::Text(s) => Some(s),
            _ => None,
        })),
        (CollectionType::Int, v) => Slot::Num(v.and_then(|v| match v {
            CollectionValue::Int(i) => Some(i as f64),
            _ => None,
        })),
        (CollectionType::Num, v) => Slot::Num(v.and_then(|v| match v {
            CollectionValue::Num(n) => Some(n),
            _ => None,
        })),
        (CollectionType::Date, v) => Slot::Date(v.and_then(|v| match v {
            CollectionValue::Date(d) => Some(d),
            _ => None,
        })),
        (other, _) => {
            return Err(DocError::validation(format!("{} fields take no raw value", other.as_str())))
        }
    };
    Ok(with_slot(prev, &field.id, slot))
}

/// Replace the answer for the same field, or append it.
pub fn upsert_answer(answers: &mut Vec<Answer>, answer: Answer) {
    match answers.iter_mut().find(|a| a.data_field_id == answer.data_field_id) {
        Some(existing) => *existing = answer,
        None => answers.push(answer),
    }
}

pub fn find_answer<'a>(answers: &'a [Answer], data_field_id: &str) -> Option<&'a Answer> {
    answers.iter().find(|a| a.data_field_id == data_field_id)
}

fn expect_type(field: &DataField, expected: CollectionType) -> DocResult<()> {
    if field.collection_type == expected {
        Ok(())
    } else {
        Err(DocError::validation(format!(
            "field {} is {}, not {}",
            field.id,
            field.collection_type.as_str(),
            expected.as_str()
        )))
    }
}

fn expect_option<'a>(
    field: &'a DataField,
    option_id: &str,
) -> DocResult<&'a crate::data_field::model::SelectOption> {
    field
        .option(option_id)
        .ok_or_else(|| DocError::validation(format!("unknown option {} for field {}", option_id, field.id)))
}
