use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Bookmark, BookmarkChanges, Collection, NewBookmark};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::{AuthUser, OwnershipGuard};

use super::validation::{self, double_option, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Empty string means uncategorized
    pub collection_id: Option<String>,
}

/// Update body. Keys that are absent keep the stored value, except `tags`,
/// which is always replaced (absent means empty). `null` clears
/// `description` and un-categorizes via `collectionId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmarkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<Option<String>>,
}

/// Bookmark operations on behalf of one authenticated caller
pub struct BookmarkService<'a> {
    store: &'a dyn Store,
    guard: OwnershipGuard<'a>,
}

impl<'a> BookmarkService<'a> {
    pub fn new(store: &'a dyn Store, user: &'a AuthUser) -> Self {
        Self {
            store,
            guard: OwnershipGuard::new(store, user),
        }
    }

    fn user_id(&self) -> String {
        self.guard.user().id.clone()
    }

    pub async fn list(&self) -> Result<Vec<Bookmark>, ApiError> {
        Ok(self.store.list_bookmarks(&self.guard.user().id).await?)
    }

    pub async fn list_in(&self, collection_id: &str) -> Result<Vec<Bookmark>, ApiError> {
        let collection = self.guard.collection(collection_id).await?;
        Ok(self.store.list_collection_bookmarks(collection.id).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Bookmark, ApiError> {
        self.guard.bookmark(id).await
    }

    pub async fn create(&self, request: CreateBookmarkRequest) -> Result<Bookmark, ApiError> {
        let mut new = self.validate_new(&request)?;

        if let Some(raw) = request.collection_id.as_deref().filter(|c| !c.trim().is_empty()) {
            new.collection_id = Some(self.guard.collection(raw.trim()).await?.id);
        }

        self.insert(new).await
    }

    /// Create inside a collection named by the route; a body `collectionId` is ignored
    pub async fn create_in(&self, collection_id: &str, request: CreateBookmarkRequest) -> Result<Bookmark, ApiError> {
        let collection = self.guard.collection(collection_id).await?;
        let mut new = self.validate_new(&request)?;
        new.collection_id = Some(collection.id);
        self.insert(new).await
    }

    pub async fn update(&self, id: &str, request: UpdateBookmarkRequest) -> Result<Bookmark, ApiError> {
        let existing = self.guard.bookmark(id).await?;
        self.apply_update(existing, request).await
    }

    pub async fn update_in(
        &self,
        collection_id: &str,
        id: &str,
        request: UpdateBookmarkRequest,
    ) -> Result<Bookmark, ApiError> {
        let existing = self.member(collection_id, id).await?;
        self.apply_update(existing, request).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let existing = self.guard.bookmark(id).await?;
        self.store.delete_bookmark(existing.id).await?;
        Ok(())
    }

    pub async fn delete_in(&self, collection_id: &str, id: &str) -> Result<(), ApiError> {
        let existing = self.member(collection_id, id).await?;
        self.store.delete_bookmark(existing.id).await?;
        Ok(())
    }

    /// Bookmark that the caller owns and that sits in the caller's collection
    async fn member(&self, collection_id: &str, id: &str) -> Result<Bookmark, ApiError> {
        let collection: Collection = self.guard.collection(collection_id).await?;
        let bookmark = self.guard.bookmark(id).await?;
        if bookmark.collection_id != Some(collection.id) {
            return Err(ApiError::not_found("Bookmark not found"));
        }
        Ok(bookmark)
    }

    fn validate_new(&self, request: &CreateBookmarkRequest) -> Result<NewBookmark, ApiError> {
        let mut errors = FieldErrors::default();
        let url = errors.check("url", validation::bookmark_url(request.url.as_deref()));
        let title = errors.check("title", validation::required(request.title.as_deref(), "Title"));
        errors.into_result("Invalid bookmark")?;

        Ok(NewBookmark {
            url: url.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description: validation::description(request.description.clone()),
            tags: validation::tags(request.tags.clone().unwrap_or_default()),
            collection_id: None,
            user_id: self.user_id(),
        })
    }

    async fn insert(&self, new: NewBookmark) -> Result<Bookmark, ApiError> {
        let bookmark = self.store.create_bookmark(new).await?;
        tracing::info!("Created bookmark {} for user {}", bookmark.id, bookmark.user_id);
        Ok(bookmark)
    }

    async fn apply_update(&self, existing: Bookmark, request: UpdateBookmarkRequest) -> Result<Bookmark, ApiError> {
        let mut errors = FieldErrors::default();
        let url = match request.url.as_deref() {
            Some(raw) => errors.check("url", validation::bookmark_url(Some(raw))),
            None => Some(existing.url.clone()),
        };
        let title = match request.title.as_deref() {
            Some(raw) => errors.check("title", validation::required(Some(raw), "Title")),
            None => Some(existing.title.clone()),
        };
        errors.into_result("Invalid bookmark")?;

        let description = match request.description {
            None => existing.description.clone(),
            Some(value) => validation::description(value),
        };

        let collection_id = match request.collection_id {
            None => existing.collection_id,
            Some(None) => None,
            Some(Some(raw)) if raw.trim().is_empty() => None,
            Some(Some(raw)) => Some(self.resolve_collection(raw.trim()).await?),
        };

        let changes = BookmarkChanges {
            url: url.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description,
            tags: validation::tags(request.tags.unwrap_or_default()),
            collection_id,
        };

        Ok(self.store.update_bookmark(existing.id, changes).await?)
    }

    async fn resolve_collection(&self, raw: &str) -> Result<Uuid, ApiError> {
        Ok(self.guard.collection(raw).await?.id)
    }
}
