//! Family domain models.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::access::Scoped;

/// A family case, numbered for lookup by staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: String,
    pub number: i64,
    /// Staff member responsible for the family.
    pub user_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub children_in_household: i32,
    #[serde(default)]
    pub caregivers: Vec<Caregiver>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caregiver {
    pub id: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl Scoped for Family {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

/// Body of a family creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFamily {
    #[serde(default)]
    pub children_in_household: i32,
    #[serde(default)]
    pub caregivers: Vec<Caregiver>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Partial family update. Ownership and number are not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyUpdate {
    pub children_in_household: Option<i32>,
    pub caregivers: Option<Vec<Caregiver>>,
    pub children: Option<Vec<Child>>,
    pub comments: Option<String>,
}

impl Family {
    pub fn apply(&mut self, update: FamilyUpdate) {
        if let Some(n) = update.children_in_household {
            self.children_in_household = n;
        }
        if let Some(caregivers) = update.caregivers {
            self.caregivers = caregivers;
        }
        if let Some(children) = update.children {
            self.children = children;
        }
        if let Some(comments) = update.comments {
            self.comments = Some(comments);
        }
        self.updated_at = Utc::now();
    }

    /// Label used in the family picker, e.g.
    /// `Familiennummer: 12 (2 Bezugspersonen, Kinder (2): 3, unbekanntes Alter)`.
    pub fn option_label(&self, today: NaiveDate) -> String {
        let ages = self
            .children
            .iter()
            .map(|c| match c.date_of_birth {
                Some(dob) => age_in_years(dob, today).to_string(),
                None => "unbekanntes Alter".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Familiennummer: {} ({} Bezugspersonen, Kinder ({}): {})",
            self.number,
            self.caregivers.len(),
            self.children_in_household,
            ages
        )
    }
}

/// Full years between `date_of_birth` and `today`.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Reference to a family embedded in other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyRef {
    pub id: String,
    pub number: i64,
}

impl From<&Family> for FamilyRef {
    fn from(family: &Family) -> Self {
        Self {
            id: family.id.clone(),
            number: family.number,
        }
    }
}
