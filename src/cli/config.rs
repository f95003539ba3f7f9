use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

/// Server selection and login state, kept in `session.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSession {
    pub server: String,
    pub token: Option<String>,
    pub email: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
}

impl Default for CliSession {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            token: None,
            email: None,
            logged_in_at: None,
        }
    }
}

impl CliSession {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_in(&mut self, email: &str, token: Option<String>) {
        self.email = Some(email.to_string());
        self.logged_in_at = token.as_ref().map(|_| Utc::now());
        self.token = token;
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.email = None;
        self.logged_in_at = None;
    }

    /// API client for the selected server carrying the saved token
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.server)?.with_token(self.token.clone()))
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("BOOKMARKS_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("bookmarks").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<CliSession> {
    let session_file = get_config_dir()?.join("session.json");

    if !session_file.exists() {
        return Ok(CliSession::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: CliSession = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session(session: &CliSession) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join("session.json");

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}

pub async fn ping_server(url: &str) -> ServerStatus {
    let client = reqwest::Client::new();
    let url = format!("{}/health", url.trim_end_matches('/'));

    match client.get(&url).timeout(std::time::Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}
