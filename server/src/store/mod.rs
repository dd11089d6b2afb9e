//! Read-only access to the `Image` entities.
//!
//! [`ImageStore`] is the seam between the query handlers and the backing
//! store.  Production uses Google Cloud Datastore over its REST API; local
//! development and tests use an in-memory fixture store.

mod datastore;
mod memory;
mod token;

use std::future::Future;
use std::path::Path;

use gallery_common::config::Config;
use gallery_common::model::ImageRecord;
use serde::Deserialize;
use tracing::info;

pub use datastore::DatastoreClient;
pub use memory::MemoryStore;
pub use token::TokenSource;

/// "Most recent N images, optionally after cursor."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    pub limit: u32,
    pub cursor: Option<String>,
}

/// Whether the store has results beyond the returned batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoreResults {
    MoreResultsTypeUnspecified,
    NotFinished,
    MoreResultsAfterLimit,
    MoreResultsAfterCursor,
    NoMoreResults,
    /// Any state this client does not know about; treated as "more".
    #[serde(other)]
    Unknown,
}

/// One batch of records as the store reported it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePage {
    pub records: Vec<ImageRecord>,
    pub end_cursor: Option<String>,
    pub more_results: Option<MoreResults>,
}

impl StorePage {
    /// Cursor for the following page: the store's end cursor, unless the
    /// store said there is nothing more (or said nothing at all).
    pub fn next_cursor(&self) -> Option<String> {
        match self.more_results {
            Some(more) if more != MoreResults::NoMoreResults => self.end_cursor.clone(),
            _ => None,
        }
    }
}

/// Errors raised while querying a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Datastore returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No access token available: {0}")]
    Auth(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Cannot read fixtures {path}: {source}")]
    Fixture {
        path: String,
        source: std::io::Error,
    },
}

/// A source of image records ordered by `created`, newest first.
pub trait ImageStore: Send + Sync {
    fn recent_images(
        &self,
        query: &ImageQuery,
    ) -> impl Future<Output = Result<StorePage, StoreError>> + Send;
}

/// The store selected by configuration.
#[derive(Debug)]
pub enum Store {
    Datastore(DatastoreClient),
    Memory(MemoryStore),
}

impl Store {
    /// Fixture file when `GALLERY_FIXTURES` is set, Datastore otherwise.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        match &config.fixtures {
            Some(path) => {
                let store = MemoryStore::from_file(Path::new(path))?;
                info!("Serving {} fixture image(s) from {path}", store.len());
                Ok(Store::Memory(store))
            }
            None => {
                let client = DatastoreClient::new(config)?;
                info!(
                    "Querying Datastore project {} (kind={})",
                    config.project_id, config.kind
                );
                Ok(Store::Datastore(client))
            }
        }
    }
}

impl ImageStore for Store {
    async fn recent_images(&self, query: &ImageQuery) -> Result<StorePage, StoreError> {
        match self {
            Store::Datastore(client) => client.recent_images(query).await,
            Store::Memory(store) => store.recent_images(query).await,
        }
    }
}
