use uuid::Uuid;

use crate::database::models::{Bookmark, Collection};
use crate::database::Store;
use crate::error::ApiError;

use super::auth::AuthUser;

/// A row carrying an owner field
pub trait Owned {
    /// Name used in the 404 message
    const KIND: &'static str;

    fn owner_id(&self) -> &str;
}

impl Owned for Bookmark {
    const KIND: &'static str = "Bookmark";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for Collection {
    const KIND: &'static str = "Collection";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Resolves resources on behalf of the caller.
///
/// Absent rows, rows owned by someone else and ids that are not UUIDs all
/// produce the same 404, so callers cannot discover other users' data.
pub struct OwnershipGuard<'a> {
    store: &'a dyn Store,
    user: &'a AuthUser,
}

impl<'a> OwnershipGuard<'a> {
    pub fn new(store: &'a dyn Store, user: &'a AuthUser) -> Self {
        Self { store, user }
    }

    pub fn user(&self) -> &AuthUser {
        self.user
    }

    pub async fn collection(&self, raw_id: &str) -> Result<Collection, ApiError> {
        let id = parse_id::<Collection>(raw_id)?;
        let found = self.store.find_collection(id).await?;
        self.check(found)
    }

    pub async fn bookmark(&self, raw_id: &str) -> Result<Bookmark, ApiError> {
        let id = parse_id::<Bookmark>(raw_id)?;
        let found = self.store.find_bookmark(id).await?;
        self.check(found)
    }

    /// Admit the row only when the caller owns it
    pub fn check<T: Owned>(&self, found: Option<T>) -> Result<T, ApiError> {
        match found {
            Some(row) if row.owner_id() == self.user.id => Ok(row),
            Some(_) => {
                tracing::warn!("{} access denied for user {}", T::KIND, self.user.id);
                Err(not_found::<T>())
            }
            None => Err(not_found::<T>()),
        }
    }
}

fn parse_id<T: Owned>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found::<T>())
}

fn not_found<T: Owned>() -> ApiError {
    ApiError::not_found(format!("{} not found", T::KIND))
}
