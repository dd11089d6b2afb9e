//! Shared data-transfer objects used by the store, the JSON API and the
//! Leptos pages.

use serde::{Deserialize, Serialize};

// ─── Image record ────────────────────────────────────────────────────────────

/// An `Image` entity as stored in Datastore, after lenient decoding.
///
/// Missing or malformed properties have already been replaced by their
/// defaults, so every record can be turned into an [`ImageItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub haiku: Vec<String>,
    #[serde(default)]
    pub brightness: f64,
    #[serde(default)]
    pub created: Option<String>,
}

// ─── View model ──────────────────────────────────────────────────────────────

/// One gallery row.  Both the page route and `/api/images` emit exactly
/// these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub url: Option<String>,
    pub haiku: Vec<String>,
    pub line1: String,
    pub line2: String,
    pub line3: String,
    pub brightness: f64,
    pub created: Option<String>,
}

impl From<ImageRecord> for ImageItem {
    fn from(record: ImageRecord) -> Self {
        let line = |i: usize| record.haiku.get(i).cloned().unwrap_or_default();
        let (line1, line2, line3) = (line(0), line(1), line(2));
        ImageItem {
            url: record.public_url,
            haiku: record.haiku,
            line1,
            line2,
            line3,
            brightness: record.brightness,
            created: record.created,
        }
    }
}

impl ImageItem {
    /// Value for the row's `data-src` attribute.  Rows without a URL carry
    /// the sentinel so the viewer ignores them.
    pub fn data_src(&self) -> &str {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(crate::viewer::NO_IMAGE)
    }

    /// `created` as `YYYY-MM-DD`, or the raw value when it is not RFC 3339.
    pub fn display_date(&self) -> String {
        match self.created.as_deref() {
            Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|_| raw.to_string()),
            None => String::new(),
        }
    }
}

// ─── Pages ───────────────────────────────────────────────────────────────────

/// One page of results from the store, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePage {
    pub items: Vec<ImageItem>,
    /// Continuation cursor, `None` once the store has no more results.
    pub cursor: Option<String>,
}

/// Data behind the server-rendered gallery page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryPage {
    pub items: Vec<ImageItem>,
    pub cursor: Option<String>,
    pub limit: u32,
}

impl GalleryPage {
    /// Empty state shown when the store cannot be reached.
    pub fn empty() -> Self {
        GalleryPage {
            items: Vec::new(),
            cursor: None,
            limit: crate::paging::DEFAULT_LIMIT,
        }
    }

    pub fn from_page(page: ImagePage, limit: u32) -> Self {
        GalleryPage {
            items: page.items,
            cursor: page.cursor,
            limit,
        }
    }
}

// ─── API bodies ──────────────────────────────────────────────────────────────

/// Body of a failed `/api/images` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesError {
    pub items: Vec<ImageItem>,
    pub cursor: Option<String>,
    pub error: String,
}

impl ImagesError {
    pub fn new(message: &str) -> Self {
        ImagesError {
            items: Vec::new(),
            cursor: None,
            error: message.to_string(),
        }
    }
}

/// Health-check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(haiku: &[&str]) -> ImageRecord {
        ImageRecord {
            public_url: Some("https://cdn.example/a.jpg".into()),
            haiku: haiku.iter().map(|s| s.to_string()).collect(),
            brightness: 0.42,
            created: Some("2024-05-01T10:00:00.000Z".into()),
        }
    }

    #[test]
    fn test_item_lines_positional() {
        let item = ImageItem::from(record(&["old pond", "frog leaps in"]));
        assert_eq!(item.line1, "old pond");
        assert_eq!(item.line2, "frog leaps in");
        assert_eq!(item.line3, "");
        assert_eq!(item.haiku.len(), 2);
    }

    #[test]
    fn test_item_missing_fields() {
        let item = ImageItem::from(ImageRecord::default());
        assert_eq!(item.url, None);
        assert!(item.haiku.is_empty());
        assert_eq!((item.line1.as_str(), item.line2.as_str(), item.line3.as_str()), ("", "", ""));
        assert_eq!(item.brightness, 0.0);
        assert_eq!(item.created, None);
        assert_eq!(item.data_src(), "Null");
    }

    #[test]
    fn test_item_serialises_exact_fields() {
        let item = ImageItem::from(record(&["a", "b", "c"]));
        let value = serde_json::to_value(&item).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["brightness", "created", "haiku", "line1", "line2", "line3", "url"]
        );
    }

    #[test]
    fn test_display_date() {
        let item = ImageItem::from(record(&[]));
        assert_eq!(item.display_date(), "2024-05-01");

        let mut odd = item.clone();
        odd.created = Some("last spring".into());
        assert_eq!(odd.display_date(), "last spring");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ImagesError::new("Failed to load images")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "items": [], "cursor": null, "error": "Failed to load images" })
        );
    }

    #[test]
    fn test_empty_gallery_page() {
        let body = serde_json::to_value(GalleryPage::empty()).unwrap();
        assert_eq!(body, serde_json::json!({ "items": [], "cursor": null, "limit": 20 }));
    }
}
