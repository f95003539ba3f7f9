use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::SessionResponse;
use crate::database::models::{Bookmark, Collection, CollectionSummary, User};
use crate::middleware::Message;
use crate::services::{CreateBookmarkRequest, CreateCollectionRequest, UpdateBookmarkRequest};

use super::refresh::RefreshNotifier;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the server's `error` field
    #[error("{message} ({status})")]
    Api { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

/// HTTP client for one server. Clones share the token and the refresh notifier.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    refresh: RefreshNotifier,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
            refresh: RefreshNotifier::new(),
        })
    }

    pub fn with_token(self, token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub fn refresh(&self) -> &RefreshNotifier {
        &self.refresh
    }

    // Auth

    pub async fn signup(&self, email: &str, password: &str, name: Option<&str>) -> Result<SessionResponse, ClientError> {
        let body = json!({ "email": email, "password": password, "name": name });
        let session: SessionResponse = self.send(self.request(Method::POST, "/api/auth/signup").await.json(&body)).await?;
        self.remember(&session).await;
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        let session: SessionResponse = self.send(self.request(Method::POST, "/api/auth/login").await.json(&body)).await?;
        self.remember(&session).await;
        Ok(session)
    }

    pub async fn logout(&self) -> Result<Message, ClientError> {
        let message = self.send(self.request(Method::POST, "/api/auth/logout").await).await?;
        *self.token.write().await = None;
        self.refresh.notify();
        Ok(message)
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/api/auth/user").await).await
    }

    // Bookmarks

    pub async fn list_bookmarks(&self) -> Result<Vec<Bookmark>, ClientError> {
        self.send(self.request(Method::GET, "/api/bookmarks").await).await
    }

    pub async fn get_bookmark(&self, id: Uuid) -> Result<Bookmark, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/bookmarks/{id}")).await).await
    }

    pub async fn create_bookmark(&self, request: &CreateBookmarkRequest) -> Result<Bookmark, ClientError> {
        let builder = self.request(Method::POST, "/api/bookmarks").await.json(request);
        self.mutate(builder).await
    }

    pub async fn update_bookmark(&self, id: Uuid, request: &UpdateBookmarkRequest) -> Result<Bookmark, ClientError> {
        let builder = self.request(Method::PUT, &format!("/api/bookmarks/{id}")).await.json(request);
        self.mutate(builder).await
    }

    pub async fn delete_bookmark(&self, id: Uuid) -> Result<Message, ClientError> {
        let builder = self.request(Method::DELETE, &format!("/api/bookmarks/{id}")).await;
        self.mutate(builder).await
    }

    // Collections

    pub async fn list_collections(&self) -> Result<Vec<CollectionSummary>, ClientError> {
        self.send(self.request(Method::GET, "/api/collections").await).await
    }

    pub async fn get_collection(&self, id: Uuid) -> Result<Collection, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/collections/{id}")).await).await
    }

    pub async fn create_collection(&self, name: &str) -> Result<Collection, ClientError> {
        let request = CreateCollectionRequest {
            name: Some(name.to_string()),
        };
        let builder = self.request(Method::POST, "/api/collections").await.json(&request);
        self.mutate(builder).await
    }

    pub async fn delete_collection(&self, id: Uuid) -> Result<Message, ClientError> {
        let builder = self.request(Method::DELETE, &format!("/api/collections/{id}")).await;
        self.mutate(builder).await
    }

    // Bookmarks inside a collection

    pub async fn list_collection_bookmarks(&self, collection_id: Uuid) -> Result<Vec<Bookmark>, ClientError> {
        let path = format!("/api/collections/{collection_id}/bookmarks");
        self.send(self.request(Method::GET, &path).await).await
    }

    pub async fn create_collection_bookmark(
        &self,
        collection_id: Uuid,
        request: &CreateBookmarkRequest,
    ) -> Result<Bookmark, ClientError> {
        let path = format!("/api/collections/{collection_id}/bookmarks");
        self.mutate(self.request(Method::POST, &path).await.json(request)).await
    }

    pub async fn update_collection_bookmark(
        &self,
        collection_id: Uuid,
        id: Uuid,
        request: &UpdateBookmarkRequest,
    ) -> Result<Bookmark, ClientError> {
        let path = format!("/api/collections/{collection_id}/bookmarks/{id}");
        self.mutate(self.request(Method::PUT, &path).await.json(request)).await
    }

    pub async fn delete_collection_bookmark(&self, collection_id: Uuid, id: Uuid) -> Result<Message, ClientError> {
        let path = format!("/api/collections/{collection_id}/bookmarks/{id}");
        self.mutate(self.request(Method::DELETE, &path).await).await
    }

    // Service

    pub async fn root(&self) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, "/").await).await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, "/health").await).await
    }

    async fn remember(&self, session: &SessionResponse) {
        if let Some(token) = &session.session {
            *self.token.write().await = Some(token.access_token.clone());
            self.refresh.notify();
        }
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a mutation and advance the refresh generation when it succeeds
    async fn mutate<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let result = self.send(builder).await?;
        self.refresh.notify();
        Ok(result)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        tracing::debug!("API error {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
