use std::sync::Arc;

use anyhow::Context;

use crate::auth::{IdentityProvider, LocalIdentityProvider, RemoteIdentityProvider};
use crate::config::{AppConfig, Environment, IdentityKind};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};

/// Session cookie settings shared by the auth routes and the session middleware
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure: bool,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cookie_name: config.security.session_cookie.clone(),
            secure: config.security.require_https,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "bookmark_session".to_string(),
            secure: false,
        }
    }
}

/// Per-process handles cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            session: SessionSettings::default(),
        }
    }

    pub fn with_session(mut self, session: SessionSettings) -> Self {
        self.session = session;
        self
    }

    /// Store, identity provider and cookie settings as configured
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = build_store(config).await?;
        let identity = build_identity(config)?;
        Ok(Self::new(store, identity).with_session(SessionSettings::from_config(config)))
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    if config.database.url == "memory" {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    Ok(Arc::new(PgStore::new(pool)))
}

fn build_identity(config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    match config.identity.kind {
        IdentityKind::Local => {
            if matches!(config.environment, Environment::Production) {
                tracing::warn!("Local identity provider enabled in production");
            }
            let provider = LocalIdentityProvider::new(
                config.security.jwt_secret.clone(),
                config.security.jwt_expiry_hours,
            )?;
            Ok(Arc::new(provider))
        }
        IdentityKind::Remote => {
            let url = config
                .identity
                .url
                .as_deref()
                .context("IDENTITY_URL is required for the remote identity provider")?;
            let api_key = config.identity.api_key.clone().unwrap_or_default();
            Ok(Arc::new(RemoteIdentityProvider::new(url, api_key)?))
        }
    }
}
