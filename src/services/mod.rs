pub mod bookmark_service;
pub mod collection_service;
pub mod user_service;
pub mod validation;

pub use bookmark_service::{BookmarkService, CreateBookmarkRequest, UpdateBookmarkRequest};
pub use collection_service::{CollectionService, CreateCollectionRequest};
