use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Bookmark, BookmarkChanges, BookmarkCount, Collection, CollectionSummary, NewBookmark,
    NewCollection, NewUser, User,
};
use crate::database::repository::Store;

/// Rows carry an insertion sequence so equal timestamps still sort newest first
#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    users: HashMap<String, User>,
    collections: HashMap<Uuid, Row<Collection>>,
    bookmarks: HashMap<Uuid, Row<Bookmark>>,
}

impl Tables {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

fn newest_first<T: Clone>(mut rows: Vec<&Row<T>>, created: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    rows.sort_by(|a, b| {
        created(&b.value)
            .cmp(&created(&a.value))
            .then(b.seq.cmp(&a.seq))
    });
    rows.into_iter().map(|r| r.value.clone()).collect()
}

/// In-process store for development and tests.
///
/// Each operation holds the table lock for its whole duration, so the collection
/// cascade is atomic. Foreign keys are checked the way the SQL schema does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn foreign_key(table: &str) -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::Protocol(format!(
            "insert or update violates foreign key constraint on {table}"
        )))
    }

    fn unique(column: &str) -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::Protocol(format!(
            "duplicate key value violates unique constraint on {column}"
        )))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(Self::unique("users.email"));
        }

        let row = match tables.users.entry(user.id.clone()) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.email = user.email.clone();
                if let Some(name) = user.name.as_ref().filter(|n| !n.trim().is_empty()) {
                    existing.name = name.clone();
                }
                existing.clone()
            }
            Entry::Vacant(slot) => slot
                .insert(User {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    name: user.insert_name(),
                    created_at: Utc::now(),
                })
                .clone(),
        };

        Ok(row)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn create_collection(&self, collection: NewCollection) -> Result<Collection, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&collection.user_id) {
            return Err(Self::foreign_key("collections.user_id"));
        }

        let row = Collection {
            id: Uuid::new_v4(),
            name: collection.name,
            user_id: collection.user_id,
            created_at: Utc::now(),
        };
        let seq = tables.seq();
        tables.collections.insert(row.id, Row { seq, value: row.clone() });
        Ok(row)
    }

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.collections.get(&id).map(|r| r.value.clone()))
    }

    async fn list_collections(&self, user_id: &str) -> Result<Vec<CollectionSummary>, DatabaseError> {
        let tables = self.tables.read().await;

        let owned: Vec<_> = tables
            .collections
            .values()
            .filter(|r| r.value.user_id == user_id)
            .collect();

        let summaries = newest_first(owned, |c: &Collection| c.created_at)
            .into_iter()
            .map(|collection| {
                let bookmarks = tables
                    .bookmarks
                    .values()
                    .filter(|b| b.value.collection_id == Some(collection.id))
                    .count() as i64;
                CollectionSummary {
                    collection,
                    count: BookmarkCount { bookmarks },
                }
            })
            .collect();

        Ok(summaries)
    }

    async fn delete_collection(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.collections.contains_key(&id) {
            return Err(DatabaseError::NotFound("Collection not found".to_string()));
        }

        let before = tables.bookmarks.len();
        tables
            .bookmarks
            .retain(|_, b| b.value.collection_id != Some(id));
        let removed = (before - tables.bookmarks.len()) as u64;

        tables.collections.remove(&id);
        Ok(removed)
    }

    async fn create_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&bookmark.user_id) {
            return Err(Self::foreign_key("bookmarks.user_id"));
        }
        if let Some(collection_id) = bookmark.collection_id {
            if !tables.collections.contains_key(&collection_id) {
                return Err(Self::foreign_key("bookmarks.collection_id"));
            }
        }

        let row = Bookmark {
            id: Uuid::new_v4(),
            url: bookmark.url,
            title: bookmark.title,
            description: bookmark.description,
            tags: bookmark.tags,
            collection_id: bookmark.collection_id,
            user_id: bookmark.user_id,
            created_at: Utc::now(),
        };
        let seq = tables.seq();
        tables.bookmarks.insert(row.id, Row { seq, value: row.clone() });
        Ok(row)
    }

    async fn find_bookmark(&self, id: Uuid) -> Result<Option<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.bookmarks.get(&id).map(|r| r.value.clone()))
    }

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        let owned: Vec<_> = tables
            .bookmarks
            .values()
            .filter(|r| r.value.user_id == user_id)
            .collect();
        Ok(newest_first(owned, |b: &Bookmark| b.created_at))
    }

    async fn list_collection_bookmarks(&self, collection_id: Uuid) -> Result<Vec<Bookmark>, DatabaseError> {
        let tables = self.tables.read().await;
        let members: Vec<_> = tables
            .bookmarks
            .values()
            .filter(|r| r.value.collection_id == Some(collection_id))
            .collect();
        Ok(newest_first(members, |b: &Bookmark| b.created_at))
    }

    async fn update_bookmark(&self, id: Uuid, changes: BookmarkChanges) -> Result<Bookmark, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(collection_id) = changes.collection_id {
            if !tables.collections.contains_key(&collection_id) {
                return Err(Self::foreign_key("bookmarks.collection_id"));
            }
        }

        let row = tables
            .bookmarks
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound("Bookmark not found".to_string()))?;
        row.value.apply(changes);
        Ok(row.value.clone())
    }

    async fn delete_bookmark(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables
            .bookmarks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound("Bookmark not found".to_string()))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
