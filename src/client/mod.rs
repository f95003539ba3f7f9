//! Typed HTTP client for the bookmark API.
//!
//! Mutations made through one `ApiClient` advance its refresh generation, and
//! every feed built from that client re-fetches when it does.

pub mod api;
pub mod feed;
pub mod refresh;

pub use api::{ApiClient, ClientError};
pub use feed::{BookmarkFeed, CollectionFeed, Feed, FeedSource};
pub use refresh::{RefreshNotifier, RefreshSubscription};
