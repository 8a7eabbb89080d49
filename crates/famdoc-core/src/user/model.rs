//! User and organization models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::Scoped;

/// Staff role. Determines record visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Sees and edits only records they own.
    #[serde(rename = "USER")]
    User,
    /// Sees and edits records within their organization.
    #[serde(rename = "ORGCONTROLLER")]
    OrgController,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Parse from the wire name, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "USER" => Some(Self::User),
            "ORGCONTROLLER" => Some(Self::OrgController),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::OrgController => "ORGCONTROLLER",
            Self::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A staff member known to the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Identity id issued by the authentication collaborator.
    pub auth_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Filled in on reads; never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    pub created_at: DateTime<Utc>,
}

impl Scoped for User {
    fn owner_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}

/// Body of a user creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub organization_id: Option<String>,
}

/// Filter for user listings, built from query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub organization_id: Option<String>,
}

impl UserFilter {
    /// Build from raw query pairs. Unknown keys and unparsable roles are ignored.
    pub fn from_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key {
                "email" => filter.email = Some(value.to_string()),
                "role" => filter.role = Role::parse(value),
                "organizationId" => filter.organization_id = Some(value.to_string()),
                _ => {}
            }
        }
        filter
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(email) = &self.email {
            if !user.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(org) = &self.organization_id {
            if user.organization_id.as_deref() != Some(org.as_str()) {
                return false;
            }
        }
        true
    }
}
