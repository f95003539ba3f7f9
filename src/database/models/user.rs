use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Local mirror of an identity-provider account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    /// `None` keeps the stored name on upsert, or falls back to the email prefix on insert
    pub name: Option<String>,
}

impl NewUser {
    /// Name used when a row is first inserted
    pub fn insert_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_name(&self.email))
    }
}

/// Local part of an email address, used as the display name when none is given
pub fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
