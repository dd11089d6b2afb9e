//! The gallery query shared by the page route and `/api/images`:
//! "most recent N images, optionally after cursor", shaped into view models.

use gallery_common::model::{GalleryPage, ImageItem, ImagePage};
use gallery_common::paging::normalize_cursor;
use tracing::error;

use crate::store::{ImageQuery, ImageStore, StoreError};

/// Message returned to API clients when the store query fails.
pub const LOAD_ERROR: &str = "Failed to load images";

/// Run one page of the gallery query.  `limit` must already be clamped.
pub async fn load_page<S: ImageStore>(
    store: &S,
    limit: u32,
    cursor: Option<String>,
) -> Result<ImagePage, StoreError> {
    let query = ImageQuery {
        limit,
        cursor: normalize_cursor(cursor),
    };
    let page = store.recent_images(&query).await?;
    let cursor = page.next_cursor();

    Ok(ImagePage {
        items: page.records.into_iter().map(ImageItem::from).collect(),
        cursor,
    })
}

/// Page-route variant: never fails.  Store errors are logged and turned
/// into the empty state.  The flag says whether the result came from the
/// store (and may therefore be cached).
pub async fn page_data<S: ImageStore>(
    store: &S,
    limit: u32,
    cursor: Option<String>,
) -> (GalleryPage, bool) {
    match load_page(store, limit, cursor).await {
        Ok(page) => (GalleryPage::from_page(page, limit), true),
        Err(e) => {
            error!("Failed to load images from Datastore: {e}");
            (GalleryPage::empty(), false)
        }
    }
}
