//! In-memory store backed by a JSON fixture file.
//!
//! The file holds an array of objects using the Datastore property names
//! (`public_url`, `haiku`, `brightness`, `created`).  Cursors are opaque
//! offsets into the `created`-descending ordering.

use std::path::Path;

use gallery_common::model::ImageRecord;
use serde_json::Value;

use super::{ImageQuery, ImageStore, MoreResults, StoreError, StorePage};

const CURSOR_PREFIX: &str = "offset:";

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ImageRecord>,
}

impl MemoryStore {
    pub fn new(mut records: Vec<ImageRecord>) -> Self {
        // Newest first; records without `created` sort last.
        records.sort_by(|a, b| b.created.cmp(&a.created));
        MemoryStore { records }
    }

    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Fixture {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a fixture document.  Individual fields are decoded leniently,
    /// like entities coming from Datastore.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let values: Vec<Value> = serde_json::from_str(text)?;
        Ok(Self::new(values.iter().map(record_from_json).collect()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn page(&self, query: &ImageQuery) -> Result<StorePage, StoreError> {
        let start = match query.cursor.as_deref() {
            Some(cursor) => decode_cursor(cursor)?,
            None => 0,
        };
        let start = start.min(self.records.len());
        let end = (start + query.limit as usize).min(self.records.len());

        let more_results = if end < self.records.len() {
            MoreResults::MoreResultsAfterLimit
        } else {
            MoreResults::NoMoreResults
        };

        Ok(StorePage {
            records: self.records[start..end].to_vec(),
            end_cursor: Some(format!("{CURSOR_PREFIX}{end}")),
            more_results: Some(more_results),
        })
    }
}

impl ImageStore for MemoryStore {
    async fn recent_images(&self, query: &ImageQuery) -> Result<StorePage, StoreError> {
        self.page(query)
    }
}

fn decode_cursor(cursor: &str) -> Result<usize, StoreError> {
    cursor
        .strip_prefix(CURSOR_PREFIX)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| StoreError::InvalidCursor(cursor.to_string()))
}

fn record_from_json(v: &Value) -> ImageRecord {
    let string = |key: &str| v.get(key).and_then(Value::as_str).map(String::from);
    ImageRecord {
        public_url: string("public_url"),
        haiku: v
            .get("haiku")
            .and_then(Value::as_array)
            .map(|lines| {
                lines
                    .iter()
                    .filter_map(|l| l.as_str().map(String::from))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default(),
        brightness: v.get("brightness").and_then(Value::as_f64).unwrap_or(0.0),
        created: string("created"),
    }
}
