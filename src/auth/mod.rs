//! Identity provider seam.
//!
//! The provider is the source of truth for accounts and sessions; the local
//! `users` table only mirrors what it reports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod local;
pub mod remote;

pub use local::LocalIdentityProvider;
pub use remote::RemoteIdentityProvider;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider refused the request (bad credentials, duplicate email, ...)
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("identity provider misconfigured: {0}")]
    Misconfigured(String),
}

/// Account as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Result of sign-up or sign-in. Sign-up may not issue a token when the
/// provider requires email confirmation first.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub user: ProviderUser,
    pub token: Option<SessionToken>,
}

/// Account fields returned to clients by the sign-up and sign-in routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of the sign-up and sign-in routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: SessionUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionToken>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, IdentityError>;

    /// Resolve the account behind an access token; invalid or expired tokens yield `None`
    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, IdentityError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}
