//! Data field definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::model::OptionRef;
use crate::error::{DocError, DocResult};

/// Primitive type of the values collected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionType {
    Text,
    Int,
    Num,
    Date,
    Bool,
    Select,
}

impl CollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Int => "Int",
            Self::Num => "Num",
            Self::Date => "Date",
            Self::Bool => "Bool",
            Self::Select => "Select",
        }
    }
}

/// One choice of a Select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub id: String,
    pub value: String,
    /// Allows a free-text override of the label.
    #[serde(default)]
    pub is_open: bool,
    /// Help text shown next to the option.
    #[serde(default)]
    pub info: Option<String>,
}

/// A typed question or attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub select_options: Vec<SelectOption>,
    /// Options shown as checked while no answer exists.
    #[serde(default)]
    pub default_answer_select_options: Vec<OptionRef>,
    pub created_at: DateTime<Utc>,
}

impl DataField {
    pub fn option(&self, option_id: &str) -> Option<&SelectOption> {
        self.select_options.iter().find(|o| o.id == option_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSelectOption {
    pub value: String,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDataField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub select_options: Vec<NewSelectOption>,
    /// Indexes into `select_options`.
    #[serde(default)]
    pub default_options: Vec<usize>,
}

/// Editable parts of a field. The collection type and the option ids are fixed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFieldUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A parsed scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionValue {
    Text(String),
    Int(i64),
    Num(f64),
    Date(DateTime<Utc>),
}

/// Parse raw input for a scalar field. Empty input yields `None`.
/// Largest Int answer magnitude. Integers up to 2^53 are exact in f64.
pub const MAX_EXACT_INT: i64 = 1 << 53;

pub fn parse_collection_value(
    collection_type: CollectionType,
    raw: &str,
) -> DocResult<Option<CollectionValue>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = match collection_type {
        CollectionType::Text => CollectionValue::Text(raw.to_string()),
        CollectionType::Int => {
            let i = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| DocError::validation(format!("not an integer: {:?}", raw)))?;
            // Int answers are stored as f64
            if !(-MAX_EXACT_INT..=MAX_EXACT_INT).contains(&i) {
                return Err(DocError::validation(format!("integer out of range: {:?}", raw)));
            }
            CollectionValue::Int(i)
        }
        CollectionType::Num => {
            let n = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| DocError::validation(format!("not a number: {:?}", raw)))?;
            if !n.is_finite() {
                return Err(DocError::validation(format!("not a finite number: {:?}", raw)));
            }
            CollectionValue::Num(n)
        }
        CollectionType::Date => CollectionValue::Date(parse_date(raw.trim())?),
        CollectionType::Bool | CollectionType::Select => {
            return Err(DocError::validation(format!(
                "{} fields take no raw value",
                collection_type.as_str()
            )))
        }
    };
    Ok(Some(value))
}

fn parse_date(raw: &str) -> DocResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| DocError::validation(format!("not a date: {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(
            parse_collection_value(CollectionType::Int, " 42 ").unwrap(),
            Some(CollectionValue::Int(42))
        );
        assert_eq!(
            parse_collection_value(CollectionType::Num, "2.5").unwrap(),
            Some(CollectionValue::Num(2.5))
        );
        assert_eq!(
            parse_collection_value(CollectionType::Text, "Hallo").unwrap(),
            Some(CollectionValue::Text("Hallo".into()))
        );
        assert_eq!(parse_collection_value(CollectionType::Int, "").unwrap(), None);
    }

    #[test]
    fn test_parse_dates() {
        let day = parse_collection_value(CollectionType::Date, "2024-01-05").unwrap();
        let Some(CollectionValue::Date(d)) = day else { panic!("expected date") };
        assert_eq!(d.format("%Y-%m-%d %H:%M").to_string(), "2024-01-05 00:00");

        let ts = parse_collection_value(CollectionType::Date, "2024-01-05T09:30:00+01:00").unwrap();
        let Some(CollectionValue::Date(t)) = ts else { panic!("expected date") };
        assert_eq!(t.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(parse_collection_value(CollectionType::Int, "12abc").is_err());
        assert!(parse_collection_value(CollectionType::Num, "NaN").is_err());
        assert!(parse_collection_value(CollectionType::Date, "05.01.2024").is_err());
        assert!(parse_collection_value(CollectionType::Bool, "true").is_err());
    }

    #[test]
    fn test_int_must_fit_a_float_exactly() {
        assert_eq!(
            parse_collection_value(CollectionType::Int, "9007199254740992").unwrap(),
            Some(CollectionValue::Int(MAX_EXACT_INT))
        );
        assert!(parse_collection_value(CollectionType::Int, "-9007199254740992").is_ok());
        assert!(parse_collection_value(CollectionType::Int, "12345678901234567").is_err());
        assert!(parse_collection_value(CollectionType::Int, "-9007199254740993").is_err());
    }
}
