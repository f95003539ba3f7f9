use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub collection_id: Option<Uuid>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub collection_id: Option<Uuid>,
    pub user_id: String,
}

/// Fully resolved column values for an update; every field is written
#[derive(Debug, Clone)]
pub struct BookmarkChanges {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub collection_id: Option<Uuid>,
}

impl Bookmark {
    pub fn apply(&mut self, changes: BookmarkChanges) {
        self.url = changes.url;
        self.title = changes.title;
        self.description = changes.description;
        self.tags = changes.tags;
        self.collection_id = changes.collection_id;
    }
}
