//! Identity collaborator records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sign-in identity. Unique by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub auth_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An authenticated session and its role claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub auth_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetToken {
    pub token: String,
    pub auth_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    Created(Identity),
    EmailAlreadyExists,
}
