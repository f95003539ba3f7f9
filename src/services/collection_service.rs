use serde::{Deserialize, Serialize};

use crate::database::models::{Collection, CollectionSummary, NewCollection};
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::{AuthUser, OwnershipGuard};

use super::validation::{self, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: Option<String>,
}

pub struct CollectionService<'a> {
    store: &'a dyn Store,
    guard: OwnershipGuard<'a>,
}

impl<'a> CollectionService<'a> {
    pub fn new(store: &'a dyn Store, user: &'a AuthUser) -> Self {
        Self {
            store,
            guard: OwnershipGuard::new(store, user),
        }
    }

    pub async fn list(&self) -> Result<Vec<CollectionSummary>, ApiError> {
        Ok(self.store.list_collections(&self.guard.user().id).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Collection, ApiError> {
        self.guard.collection(id).await
    }

    pub async fn create(&self, request: CreateCollectionRequest) -> Result<Collection, ApiError> {
        let mut errors = FieldErrors::default();
        let name = errors.check("name", validate_name(request.name.as_deref()));
        errors.into_result("Invalid collection")?;

        let collection = self
            .store
            .create_collection(NewCollection {
                name: name.unwrap_or_default(),
                user_id: self.guard.user().id.clone(),
            })
            .await?;

        tracing::info!("Created collection {} for user {}", collection.id, collection.user_id);
        Ok(collection)
    }

    /// Remove the collection and every bookmark filed in it
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let collection = self.guard.collection(id).await?;
        let removed = self.store.delete_collection(collection.id).await?;
        tracing::info!(
            "Deleted collection {} with {} bookmark(s)",
            collection.id,
            removed
        );
        Ok(())
    }
}

fn validate_name(value: Option<&str>) -> Result<String, String> {
    validation::required(value, "Name")
}
