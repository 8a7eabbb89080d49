//! Tabulation of survey responses for display and CSV export.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::model::Response;
use crate::answer::find_answer;
use crate::answer::model::{Answer, AnswerValue};
use crate::data_field::model::{CollectionType, DataField};
use crate::error::{DocError, DocResult};

pub const FAMILY_COLUMN: &str = "family";
pub const CHILD_COLUMN: &str = "child";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub title: String,
    /// Key of the cell in each row.
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<CollectionType>,
}

/// One subject's merged answers, keyed by column field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub subject: String,
    #[serde(flatten)]
    pub cells: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<TableRow>,
}

/// Subject columns followed by one column per field, in survey order.
pub fn column_definitions(fields: &[DataField]) -> Vec<ColumnDefinition> {
    let mut columns = vec![
        ColumnDefinition {
            title: "Familiennummer".to_string(),
            field: FAMILY_COLUMN.to_string(),
            collection_type: None,
        },
        ColumnDefinition {
            title: "Kind".to_string(),
            field: CHILD_COLUMN.to_string(),
            collection_type: None,
        },
    ];
    columns.extend(fields.iter().map(|f| ColumnDefinition {
        title: f.name.clone(),
        field: f.id.clone(),
        collection_type: Some(f.collection_type),
    }));
    columns
}

/// The row a response belongs to: its child, else its family, else itself.
pub fn subject_key(response: &Response) -> String {
    if let Some(child) = &response.child_id {
        return format!("child:{}", child);
    }
    if let Some(family) = &response.family {
        return format!("family:{}", family.id);
    }
    format!("response:{}", response.id)
}

/// Merge responses into one row per subject.
///
/// Responses are applied oldest first; a later non-empty cell overwrites an
/// earlier one. Every row carries every column, blank where unanswered.
pub fn tabulate(fields: &[DataField], responses: &[Response]) -> Table {
    let columns = column_definitions(fields);

    let mut ordered: Vec<&Response> = responses.iter().collect();
    ordered.sort_by_key(|r| r.created_at);

    let mut rows: Vec<TableRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for response in ordered {
        let key = subject_key(response);
        let idx = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(TableRow {
                subject: key,
                cells: BTreeMap::new(),
            });
            rows.len() - 1
        });
        let row = &mut rows[idx];

        if let Some(family) = &response.family {
            row.cells.insert(FAMILY_COLUMN.to_string(), family.number.to_string());
        }
        if let Some(child) = &response.child_id {
            row.cells.insert(CHILD_COLUMN.to_string(), child.clone());
        }
        for field in fields {
            let Some(answer) = find_answer(&response.answers, &field.id) else {
                continue;
            };
            let cell = render_cell(field, answer);
            if !cell.is_empty() {
                row.cells.insert(field.id.clone(), cell);
            }
        }
    }

    for row in &mut rows {
        for column in &columns {
            row.cells.entry(column.field.clone()).or_default();
        }
    }

    Table { columns, rows }
}

/// Display text of an answer. Empty slots render as an empty string.
pub fn render_cell(field: &DataField, answer: &Answer) -> String {
    match answer.value(field.collection_type) {
        AnswerValue::Empty => String::new(),
        AnswerValue::Text(s) => s.to_string(),
        AnswerValue::Int(i) => i.to_string(),
        AnswerValue::Num(n) => n.to_string(),
        AnswerValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        AnswerValue::Bool(true) => "Ja".to_string(),
        AnswerValue::Bool(false) => "Nein".to_string(),
        AnswerValue::Select { selected, .. } => selected
            .iter()
            .map(|o| match field.option(&o.id) {
                Some(option) => match answer.other_value(&option.id) {
                    Some(text) if option.is_open && !text.is_empty() => text.to_string(),
                    _ => option.value.clone(),
                },
                None => o.id.clone(),
            })
            .collect::<Vec<_>>()
            .join(", "),
    }
}

impl Table {
    /// Header of column titles, then one line per row.
    pub fn to_csv(&self) -> DocResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.columns.iter().map(|c| c.title.as_str()))?;
        for row in &self.rows {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|c| row.cells.get(&c.field).map(String::as_str).unwrap_or("")),
            )?;
        }
        let bytes = writer.into_inner().map_err(|e| DocError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| DocError::validation(e.to_string()))
    }
}

/// `<surveyName>-<yyyy-MM-dd_hh-mm>.csv`, hour on the 12-hour clock.
///
/// Control characters become spaces and double quotes become single
/// quotes, so the name fits a quoted `Content-Disposition` parameter.
pub fn export_filename(survey_name: &str, at: NaiveDateTime) -> String {
    let name: String = survey_name
        .chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    format!("{}-{}.csv", name, at.format("%Y-%m-%d_%I-%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::model::{OptionRef, SelectOtherValue};
    use crate::data_field::model::SelectOption;
    use crate::family::model::FamilyRef;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn field(id: &str, name: &str, collection_type: CollectionType) -> DataField {
        DataField {
            id: id.into(),
            name: name.into(),
            description: None,
            collection_type,
            select_options: vec![
                SelectOption { id: "o1".into(), value: "Mutter".into(), is_open: false, info: None },
                SelectOption { id: "o2".into(), value: "Andere".into(), is_open: true, info: None },
            ],
            default_answer_select_options: vec![],
            created_at: Utc::now(),
        }
    }

    fn response(id: &str, family: Option<(&str, i64)>, minutes: i64, answers: Vec<Answer>) -> Response {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap() + Duration::minutes(minutes);
        Response {
            id: id.into(),
            survey_id: "s".into(),
            user_id: "u".into(),
            organization_id: None,
            family: family.map(|(id, number)| FamilyRef { id: id.into(), number }),
            child_id: None,
            answers,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_export_filename() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(export_filename("Intake", at), "Intake-2024-01-05_09-30.csv");
        assert_eq!(export_filename("Intake\nQ1 \"neu\"", at), "Intake Q1 'neu'-2024-01-05_09-30.csv");
    }

    #[test]
    fn test_merges_rows_by_subject_and_blanks_missing() {
        let fields = vec![
            field("b", "Kita", CollectionType::Bool),
            field("n", "Alter", CollectionType::Int),
        ];
        let responses = vec![
            response(
                "r2",
                Some(("fam1", 12)),
                5,
                vec![Answer { data_field_id: "n".into(), answer_num: Some(4.0), ..Default::default() }],
            ),
            response(
                "r1",
                Some(("fam1", 12)),
                0,
                vec![Answer { data_field_id: "b".into(), answer_bool: Some(false), ..Default::default() }],
            ),
            response("r3", None, 10, vec![Answer { data_field_id: "b".into(), ..Default::default() }]),
        ];

        let table = tabulate(&fields, &responses);
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.rows.len(), 2);

        let fam = &table.rows[0];
        assert_eq!(fam.subject, "family:fam1");
        assert_eq!(fam.cells["family"], "12");
        assert_eq!(fam.cells["b"], "Nein");
        assert_eq!(fam.cells["n"], "4");

        let anon = &table.rows[1];
        assert_eq!(anon.cells["b"], "");
        assert_eq!(anon.cells["family"], "");
    }

    #[test]
    fn test_select_cells_use_override_text() {
        let f = field("s", "Bezugsperson", CollectionType::Select);
        let open = Answer {
            data_field_id: "s".into(),
            answer_select: vec![OptionRef::new("o2")],
            answer_select_other_values: vec![SelectOtherValue {
                select_option_id: "o2".into(),
                value: "Tante".into(),
            }],
            ..Default::default()
        };
        assert_eq!(render_cell(&f, &open), "Tante");

        let closed = Answer {
            data_field_id: "s".into(),
            answer_select: vec![OptionRef::new("o1"), OptionRef::new("gone")],
            ..Default::default()
        };
        assert_eq!(render_cell(&f, &closed), "Mutter, gone");
    }

    #[test]
    fn test_csv_output() {
        let fields = vec![field("t", "Notiz, frei", CollectionType::Text)];
        let responses = vec![response(
            "r1",
            Some(("fam1", 3)),
            0,
            vec![Answer { data_field_id: "t".into(), answer_text: Some("a \"b\"".into()), ..Default::default() }],
        )];
        let csv = tabulate(&fields, &responses).to_csv().unwrap();
        assert_eq!(csv, "Familiennummer,Kind,\"Notiz, frei\"\n3,,\"a \"\"b\"\"\"\n");
    }
}
