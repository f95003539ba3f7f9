pub mod bookmark;
pub mod collection;
pub mod user;

pub use bookmark::{Bookmark, BookmarkChanges, NewBookmark};
pub use collection::{BookmarkCount, Collection, CollectionSummary, NewCollection};
pub use user::{NewUser, User};
