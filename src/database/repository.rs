use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Bookmark, BookmarkChanges, Collection, CollectionSummary, NewBookmark, NewCollection, NewUser,
    User,
};

/// Typed per-entity operations over the relational store.
///
/// Lookups by id are not owner-scoped; callers go through
/// [`OwnershipGuard`](crate::middleware::OwnershipGuard) before acting on a row.
/// List operations return newest first by creation time.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert the user, or refresh the email (and the name, when given) of an existing row
    async fn upsert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError>;

    async fn create_collection(&self, collection: NewCollection) -> Result<Collection, DatabaseError>;

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, DatabaseError>;

    async fn list_collections(&self, user_id: &str) -> Result<Vec<CollectionSummary>, DatabaseError>;

    /// Delete every bookmark in the collection, then the collection, as one unit.
    /// Returns the number of bookmarks removed.
    async fn delete_collection(&self, id: Uuid) -> Result<u64, DatabaseError>;

    async fn create_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, DatabaseError>;

    async fn find_bookmark(&self, id: Uuid) -> Result<Option<Bookmark>, DatabaseError>;

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, DatabaseError>;

    async fn list_collection_bookmarks(&self, collection_id: Uuid) -> Result<Vec<Bookmark>, DatabaseError>;

    async fn update_bookmark(&self, id: Uuid, changes: BookmarkChanges) -> Result<Bookmark, DatabaseError>;

    async fn delete_bookmark(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Connectivity check used by `/health`
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
