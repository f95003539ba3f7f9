use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IdentityError, IdentityProvider, ProviderSession, ProviderUser, SessionToken};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    /// Session id, revoked on sign-out
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Registry {
    accounts: HashMap<String, Account>,
    /// Signed-out session ids with their token expiry
    revoked: HashMap<Uuid, i64>,
}

impl Registry {
    fn revoke(&mut self, sid: Uuid, exp: i64) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, expires| *expires > now);
        self.revoked.insert(sid, exp);
    }
}

/// In-process identity provider for development and tests.
///
/// Accounts live in memory and are lost on restart; access tokens are HS256 JWTs.
pub struct LocalIdentityProvider {
    secret: String,
    expiry: Duration,
    hash_cost: u32,
    registry: RwLock<Registry>,
}

impl LocalIdentityProvider {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Result<Self, IdentityError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(IdentityError::Misconfigured("JWT secret not configured".to_string()));
        }

        Ok(Self {
            secret,
            expiry: Duration::hours(expiry_hours as i64),
            hash_cost: bcrypt::DEFAULT_COST,
            registry: RwLock::new(Registry::default()),
        })
    }

    /// bcrypt work factor for new accounts
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    async fn hash_password(&self, password: &str) -> Result<String, IdentityError> {
        let password = password.to_string();
        let cost = self.hash_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| IdentityError::Misconfigured(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| IdentityError::Misconfigured(format!("Password hashing error: {}", e)))
    }

    async fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| IdentityError::Misconfigured(format!("Password check task failed: {}", e)))?
            .map_err(|e| IdentityError::Misconfigured(format!("Password check error: {}", e)))
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn issue(&self, account: &Account) -> Result<SessionToken, IdentityError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account.id.clone(),
            email: account.email.clone(),
            sid: Uuid::new_v4(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| IdentityError::Misconfigured(format!("JWT generation error: {}", e)))?;

        Ok(SessionToken {
            access_token,
            expires_in: self.expiry.num_seconds(),
        })
    }

    fn decode(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| tracing::debug!("Rejected access token: {}", e))
        .ok()
    }

    fn session(&self, account: &Account) -> Result<ProviderSession, IdentityError> {
        Ok(ProviderSession {
            user: ProviderUser {
                id: account.id.clone(),
                email: account.email.clone(),
            },
            token: Some(self.issue(account)?),
        })
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, IdentityError> {
        let email = Self::normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(IdentityError::Rejected("Unable to validate email address: invalid format".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::Rejected(format!(
                "Password should be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }

        if self.registry.read().await.accounts.contains_key(&email) {
            return Err(IdentityError::Rejected("User already registered".to_string()));
        }

        let password_hash = self.hash_password(password).await?;

        let mut registry = self.registry.write().await;
        if registry.accounts.contains_key(&email) {
            return Err(IdentityError::Rejected("User already registered".to_string()));
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
        };
        registry.accounts.insert(email, account.clone());
        drop(registry);

        tracing::info!("Registered local account {}", account.id);
        self.session(&account)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, IdentityError> {
        let email = Self::normalize_email(email);
        let account = self.registry.read().await.accounts.get(&email).cloned();

        match account {
            Some(account) if Self::verify_password(password, &account.password_hash).await? => {
                self.session(&account)
            }
            _ => Err(IdentityError::Rejected("Invalid login credentials".to_string())),
        }
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, IdentityError> {
        let Some(claims) = self.decode(access_token) else {
            return Ok(None);
        };

        if self.registry.read().await.revoked.contains_key(&claims.sid) {
            return Ok(None);
        }

        Ok(Some(ProviderUser {
            id: claims.sub,
            email: claims.email,
        }))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        if let Some(claims) = self.decode(access_token) {
            self.registry.write().await.revoke(claims.sid, claims.exp);
        }
        Ok(())
    }
}
