//! Session file handling: locate, parse and validate the tokens written by `login`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::remote::http::HttpConnection;

pub const DEFAULT_API_URL: &str = "https://api.openshift.com";
const CONFIG_FILE_NAME: &str = ".ocm.json";

/// Contents of the session file.
#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<u64>,
}

/// Default location of the session file: `$HOME/.ocm.json`.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| Path::new(&home).join(CONFIG_FILE_NAME))
}

impl SessionConfig {
    /// Load the session file. `Ok(None)` means there is no session at all.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::config(format!("Can't load config file: {e}"))),
        };
        let cfg = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("Can't load config file: {e}")))?;
        Ok(Some(cfg))
    }

    /// Whether the access token is present and not yet expired.
    pub fn armed(&self) -> Result<bool> {
        self.armed_at(unix_now())
    }

    fn armed_at(&self, now: u64) -> Result<bool> {
        let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        match token_expiry(token)? {
            Some(exp) => Ok(exp > now),
            None => Ok(true),
        }
    }

    pub fn connection(&self) -> Result<HttpConnection> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| Error::config("Not logged in, run the 'login' command"))?;
        HttpConnection::new(&self.url, token)
    }
}

/// Load the session at `path`, check it and build a connection from it.
pub fn connect(path: &Path) -> Result<HttpConnection> {
    let cfg = SessionConfig::load(path)?
        .ok_or_else(|| Error::config("Not logged in, run the 'login' command"))?;
    if !cfg.armed()? {
        return Err(Error::config("Tokens have expired, run the 'login' command"));
    }
    tracing::debug!(url = %cfg.url, "session loaded");
    cfg.connection()
}

/// `exp` claim of a JWT, if it has one.
fn token_expiry(token: &str) -> Result<Option<u64>> {
    let invalid = |what: &str| Error::config(format!("Can't check if tokens have expired: {what}"));
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| invalid("malformed token"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| invalid(&e.to_string()))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| invalid(&e.to_string()))?;
    Ok(claims.exp)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
