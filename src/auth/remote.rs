use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{IdentityError, IdentityProvider, ProviderSession, ProviderUser, SessionToken};

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    user: Option<RemoteUser>,
}

/// Client for a GoTrue-compatible auth service (`/auth/v1/*`)
pub struct RemoteIdentityProvider {
    client: Client,
    base_url: url::Url,
    api_key: String,
}

impl RemoteIdentityProvider {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, IdentityError> {
        let mut base_url = url::Url::parse(base_url)
            .map_err(|e| IdentityError::Misconfigured(format!("invalid identity URL: {}", e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| IdentityError::Misconfigured(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, IdentityError> {
        self.base_url
            .join(path)
            .map_err(|e| IdentityError::Misconfigured(e.to_string()))
    }

    /// Pull the human-readable message out of a provider error body
    fn error_message(status: StatusCode, body: &Value) -> String {
        ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Authentication failed ({})", status))
    }

    async fn password_request(&self, path: &str, email: &str, password: &str) -> Result<Value, IdentityError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("unreadable response: {}", e)))?;

        Self::interpret(status, &text)
    }

    /// Failures keep their status class even when the body is not JSON
    fn interpret(status: StatusCode, text: &str) -> Result<Value, IdentityError> {
        let body = serde_json::from_str::<Value>(text);

        if !status.is_success() {
            let message = match &body {
                Ok(body) => Self::error_message(status, body),
                Err(_) => format!("Authentication failed ({})", status),
            };
            return Err(if status.is_server_error() {
                IdentityError::Unavailable(message)
            } else {
                IdentityError::Rejected(message)
            });
        }

        body.map_err(|e| IdentityError::Unavailable(format!("unreadable response: {}", e)))
    }

    /// Sign-up returns either a full session or, when confirmation is pending, the bare user
    fn parse_session(body: Value) -> Result<ProviderSession, IdentityError> {
        let parsed: TokenResponse = serde_json::from_value(body.clone())
            .map_err(|e| IdentityError::Unavailable(format!("unexpected response: {}", e)))?;

        let remote = match parsed.user {
            Some(user) => user,
            None => serde_json::from_value::<RemoteUser>(body)
                .map_err(|e| IdentityError::Unavailable(format!("response missing user: {}", e)))?,
        };

        let token = parsed.access_token.map(|access_token| SessionToken {
            access_token,
            expires_in: parsed.expires_in.unwrap_or(3600),
        });

        Ok(ProviderSession {
            user: ProviderUser {
                id: remote.id,
                email: remote.email.unwrap_or_default(),
            },
            token,
        })
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, IdentityError> {
        let body = self.password_request("auth/v1/signup", email, password).await?;
        Self::parse_session(body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, IdentityError> {
        let body = self
            .password_request("auth/v1/token?grant_type=password", email, password)
            .await?;
        Self::parse_session(body)
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(IdentityError::Unavailable(format!("user lookup failed ({})", status)));
        }
        if !status.is_success() {
            return Ok(None);
        }

        let user: RemoteUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("unreadable user: {}", e)))?;

        Ok(Some(ProviderUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.endpoint("auth/v1/logout")?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        // An already-invalid token is as signed out as it gets
        if response.status().is_server_error() {
            return Err(IdentityError::Unavailable(format!(
                "logout failed ({})",
                response.status()
            )));
        }
        Ok(())
    }
}
