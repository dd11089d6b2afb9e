//! Configuration parsing – reads an optional KEY=VALUE file and lets
//! environment variables override every key.
//!
//! The web binary and the API router share the same `Config`; each ignores
//! fields it does not need.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Project used when neither the config file nor the environment names one.
pub const DEFAULT_PROJECT_ID: &str = "taigaishida-217622";

/// Environment variables consulted (in order) for the Datastore project.
const PROJECT_ENV_KEYS: [&str; 3] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT", "PROJECT_ID"];

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ── datastore ────────────────────────────────────────────────────
    pub project_id: String,
    /// Named database; empty selects the project's default database.
    pub database_id: String,
    pub kind: String,
    /// `host:port` of a local Datastore emulator.  Requests go over plain
    /// HTTP without an access token when set.
    pub emulator_host: Option<String>,
    /// Static bearer token.  Without it the metadata server is asked.
    pub access_token: Option<String>,
    /// Instance metadata server consulted for access tokens.
    pub metadata_host: String,

    // ── local development ────────────────────────────────────────────
    /// JSON file of image records served instead of Datastore.
    pub fixtures: Option<String>,

    // ── http ─────────────────────────────────────────────────────────
    pub cache_max_age_secs: u32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            database_id: String::new(),
            kind: "Image".to_string(),
            emulator_host: None,
            access_token: None,
            metadata_host: "metadata.google.internal".to_string(),
            fixtures: None,
            cache_max_age_secs: 60,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/gallery/gallery.conf"
    }

    /// `Cache-Control` value for successful page loads.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }
}

/// Load configuration from `path` (if it exists) and the process environment.
///
/// A missing file is not an error; every key then comes from the
/// environment or falls back to its default.
pub fn load(path: &Path) -> Result<Config> {
    let map = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config: {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        parse_conf(&text)
    } else {
        debug!("No config file at {}, using environment", path.display());
        HashMap::new()
    };

    Ok(resolve(&map, |key| std::env::var(key).ok()))
}

/// Build a [`Config`] from file values and an environment lookup.
/// Environment values win over file values.
fn resolve(file: &HashMap<String, String>, env: impl Fn(&str) -> Option<String>) -> Config {
    let get = |key: &str| -> Option<String> {
        env(key)
            .or_else(|| file.get(key).cloned())
            .filter(|v| !v.is_empty())
    };
    let defaults = Config::default();

    let project_id = PROJECT_ENV_KEYS
        .iter()
        .find_map(|key| env(*key).filter(|v| !v.is_empty()))
        .or_else(|| {
            PROJECT_ENV_KEYS
                .iter()
                .find_map(|key| file.get(*key).cloned().filter(|v| !v.is_empty()))
        })
        .unwrap_or(defaults.project_id);

    Config {
        project_id,
        database_id: get("DATASTORE_DATABASE").unwrap_or(defaults.database_id),
        kind: get("DATASTORE_KIND").unwrap_or(defaults.kind),
        emulator_host: get("DATASTORE_EMULATOR_HOST"),
        access_token: get("GOOGLE_OAUTH_ACCESS_TOKEN"),
        metadata_host: get("GCE_METADATA_HOST").unwrap_or(defaults.metadata_host),
        fixtures: get("GALLERY_FIXTURES"),
        cache_max_age_secs: get("CACHE_MAX_AGE_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.cache_max_age_secs),
        request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs),
    }
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────
