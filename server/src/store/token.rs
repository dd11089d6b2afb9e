//! OAuth access tokens for the Datastore REST API.
//!
//! A static token (`GOOGLE_OAUTH_ACCESS_TOKEN`) is used verbatim.  Otherwise
//! the instance metadata server (`Config::metadata_host`) is asked for the
//! default service account's token, which is cached until shortly before it
//! expires.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use super::StoreError;

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
/// Refresh this long before the metadata server's expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: i64,
}

/// Supplies bearer tokens, fetching and caching them as needed.
#[derive(Debug)]
pub struct TokenSource {
    http: reqwest::Client,
    static_token: Option<String>,
    metadata_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client, static_token: Option<String>, metadata_host: &str) -> Self {
        TokenSource {
            http,
            static_token,
            metadata_url: format!("http://{metadata_host}{TOKEN_PATH}"),
            cached: Mutex::new(None),
        }
    }

    /// A token valid for at least [`EXPIRY_MARGIN_SECS`] more seconds.
    pub async fn token(&self) -> Result<String, StoreError> {
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        // Fast-path: serve from cache
        if let Some(token) = self.cached_at(Utc::now()) {
            return Ok(token);
        }

        let fetched = self.fetch_from_metadata().await?;
        let value = fetched.value.clone();
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = Some(fetched);
        Ok(value)
    }

    fn cached_at(&self, now: DateTime<Utc>) -> Option<String> {
        let guard = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|t| t.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now)
            .map(|t| t.value.clone())
    }

    async fn fetch_from_metadata(&self) -> Result<CachedToken, StoreError> {
        let resp = self
            .http
            .get(&self.metadata_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| StoreError::Auth(format!("metadata server unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(StoreError::Auth(format!(
                "metadata server returned {}",
                resp.status()
            )));
        }

        let token: MetadataToken = serde_json::from_slice(&resp.bytes().await?)?;
        debug!("Fetched access token (expires in {}s)", token.expires_in);
        Ok(CachedToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }
}
