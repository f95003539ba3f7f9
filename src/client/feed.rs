use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Bookmark, CollectionSummary};

use super::api::{ApiClient, ClientError};
use super::refresh::RefreshSubscription;

/// Where a feed loads its items from
#[async_trait]
pub trait FeedSource: Send + Sync {
    type Item: Send;

    async fn fetch(&self, client: &ApiClient) -> Result<Vec<Self::Item>, ClientError>;
}

/// All of the caller's bookmarks, or the bookmarks of one collection
#[derive(Debug, Clone, Copy)]
pub struct Bookmarks(pub Option<Uuid>);

#[async_trait]
impl FeedSource for Bookmarks {
    type Item = Bookmark;

    async fn fetch(&self, client: &ApiClient) -> Result<Vec<Bookmark>, ClientError> {
        match self.0 {
            Some(collection_id) => client.list_collection_bookmarks(collection_id).await,
            None => client.list_bookmarks().await,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Collections;

#[async_trait]
impl FeedSource for Collections {
    type Item = CollectionSummary;

    async fn fetch(&self, client: &ApiClient) -> Result<Vec<CollectionSummary>, ClientError> {
        client.list_collections().await
    }
}

/// List view that loads once, then reloads whenever the client's refresh
/// generation advances.
pub struct Feed<S: FeedSource> {
    client: ApiClient,
    source: S,
    subscription: RefreshSubscription,
    items: Vec<S::Item>,
    loaded: bool,
}

pub type BookmarkFeed = Feed<Bookmarks>;
pub type CollectionFeed = Feed<Collections>;

impl BookmarkFeed {
    pub fn all(client: &ApiClient) -> Self {
        Feed::new(client, Bookmarks(None))
    }

    pub fn in_collection(client: &ApiClient, collection_id: Uuid) -> Self {
        Feed::new(client, Bookmarks(Some(collection_id)))
    }
}

impl CollectionFeed {
    pub fn collections(client: &ApiClient) -> Self {
        Feed::new(client, Collections)
    }
}

impl<S: FeedSource> Feed<S> {
    pub fn new(client: &ApiClient, source: S) -> Self {
        Self {
            client: client.clone(),
            subscription: client.refresh().subscribe(),
            source,
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Last loaded items; empty until the first load
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    /// Fetch now, regardless of the refresh generation
    pub async fn reload(&mut self) -> Result<&[S::Item], ClientError> {
        self.items = self.source.fetch(&self.client).await?;
        self.loaded = true;
        Ok(&self.items)
    }

    /// First call loads immediately; later calls wait for the next refresh
    pub async fn next(&mut self) -> Result<&[S::Item], ClientError> {
        if self.loaded {
            // The feed's own client clone keeps the notifier alive
            let _ = self.subscription.changed().await;
        }
        self.reload().await
    }
}
