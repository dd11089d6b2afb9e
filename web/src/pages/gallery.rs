//! Gallery page – the image table, hover preview, jumbo viewer and pager.

use gallery_common::model::GalleryPage;
use gallery_common::paging::normalize_cursor;
use gallery_common::viewer::{PageRequest, Pager, Viewer};
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::image_table::ImageTable;
use crate::components::pager::PagerControls;
use crate::components::viewer::{HoverPreview, JumboViewer};

// ─── Server function ─────────────────────────────────────────────────────────

/// One page of the gallery.  Store failures come back as the empty page
/// rather than an error; successful loads are marked cacheable.
#[server(prefix = "/api", endpoint = "gallery_page")]
pub async fn get_gallery_page(
    limit: Option<String>,
    cursor: Option<String>,
) -> Result<GalleryPage, ServerFnError> {
    use gallery_common::paging::clamp_limit;
    use gallery_server::gallery;

    let state = use_context::<crate::app::AppState>()
        .ok_or_else(|| ServerFnError::new("Missing AppState"))?;
    let limit = clamp_limit(limit.as_deref());

    let (page, cacheable) = gallery::page_data(state.store.as_ref(), limit, cursor).await;
    if cacheable {
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            if let Ok(value) = http::HeaderValue::from_str(&state.config.cache_control()) {
                response.insert_header(http::header::CACHE_CONTROL, value);
            }
        }
    }
    Ok(page)
}

/// Result of loading the page that starts at `.0`.
type Loaded = (Option<String>, Result<GalleryPage, ServerFnError>);

/// Apply the continuation cursor of the page on screen, if it belongs to
/// the pager's current page.
fn settled(mut pager: Pager, loaded: Option<Loaded>) -> Pager {
    if let Some((start, Ok(page))) = loaded {
        if start.as_deref() == pager.current_cursor() {
            pager.loaded(page.cursor);
        }
    }
    pager
}

// ─── Page component ──────────────────────────────────────────────────────────

/// The photo table with its preview and jumbo viewer.
#[component]
pub fn Gallery() -> impl IntoView {
    let query = use_query_map();
    let limit = query.get_untracked().get("limit");
    let start = normalize_cursor(query.get_untracked().get("cursor"));

    let viewer = RwSignal::new(Viewer::new());
    let pager = RwSignal::new(Pager::new(start));

    let page = Resource::new(
        move || pager.with(|p| p.current_cursor().map(String::from)),
        move |cursor| {
            let limit = limit.clone();
            async move {
                let result = get_gallery_page(limit, cursor.clone()).await;
                (cursor, result)
            }
        },
    );

    // Read only inside the <Transition> so SSR and hydration agree.
    let shown_pager = Signal::derive(move || settled(pager.get(), page.get()));
    let on_request = Callback::new(move |request: PageRequest| {
        let mut next = settled(pager.get_untracked(), page.get_untracked());
        if next.request(request) {
            pager.set(next);
        }
    });

    view! {
        <div class="gallery-page">
            <section class="gallery-list">
                <Transition fallback=move || view! { <p class="loading">"Loading…"</p> }>
                    {move || page.get().map(|(_, res)| match res {
                        Ok(data) => view! {
                            <ImageTable items=data.items viewer=viewer/>
                            <p class="page-size">{data.limit} " per page"</p>
                        }.into_any(),
                        Err(e) => view! {
                            <p class="error">"Error: " {e.to_string()}</p>
                        }.into_any(),
                    })}
                    <PagerControls pager=shown_pager on_request=on_request/>
                </Transition>
            </section>

            <aside class="gallery-jumbo">
                <JumboViewer viewer=viewer/>
            </aside>

            <HoverPreview viewer=viewer/>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(cursor: Option<&str>) -> GalleryPage {
        GalleryPage {
            items: vec![],
            cursor: cursor.map(String::from),
            limit: 20,
        }
    }

    #[test]
    fn test_settled_applies_matching_page() {
        let pager = settled(Pager::default(), Some((None, Ok(page(Some("c1"))))));
        assert!(!pager.next_disabled());

        let pager = settled(Pager::default(), Some((None, Ok(page(None)))));
        assert!(pager.next_disabled());
    }

    #[test]
    fn test_settled_ignores_stale_page() {
        let mut pager = Pager::default();
        pager.loaded(Some("c1".into()));
        pager.request(PageRequest::Next);

        // Page 1's result is still on screen while page 2 loads.
        let shown = settled(pager.clone(), Some((None, Ok(page(None)))));
        assert_eq!(shown, pager);
        assert!(!shown.next_disabled());
    }

    #[test]
    fn test_settled_without_data() {
        assert_eq!(settled(Pager::default(), None), Pager::default());
    }

    // ─── Page route over the full SSR router ────────────────────────────

    #[cfg(feature = "ssr")]
    mod route {
        use std::sync::Arc;

        use axum::body::{to_bytes, Body};
        use axum::http::{header, Request, StatusCode};
        use gallery_common::config::Config;
        use gallery_common::model::ImageRecord;
        use gallery_server::store::{MemoryStore, Store};
        use leptos::prelude::LeptosOptions;
        use tower::ServiceExt;

        use crate::app::{router, AppState};

        fn app() -> axum::Router {
            let store = MemoryStore::new(vec![
                ImageRecord {
                    public_url: Some("https://img.example/fuji.jpg".into()),
                    haiku: vec!["snow on the summit".into()],
                    brightness: 0.8,
                    created: Some("2024-03-02T10:00:00Z".into()),
                },
                ImageRecord {
                    public_url: None,
                    haiku: vec!["lost in the darkroom".into()],
                    brightness: 0.1,
                    created: Some("2024-03-01T10:00:00Z".into()),
                },
            ]);
            let state = AppState {
                store: Arc::new(Store::Memory(store)),
                config: Arc::new(Config::default()),
            };
            let options = LeptosOptions::builder().output_name("gallery-web").build();
            router(state, options)
        }

        async fn get(uri: &str) -> (StatusCode, Option<String>, String) {
            let resp = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = resp.status();
            let cache = resp
                .headers()
                .get(header::CACHE_CONTROL)
                .map(|v| v.to_str().unwrap().to_string());
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            (status, cache, String::from_utf8(bytes.to_vec()).unwrap())
        }

        #[tokio::test]
        async fn test_page_sets_cache_control() {
            let (status, cache, body) = get("/").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache.as_deref(), Some("public, max-age=60"));
            // Pager is rendered with the loaded page, not before it.
            assert!(body.contains(r#"id="prevButton""#));
            assert!(body.contains(r#"id="currentPageNumber""#));
        }

        #[tokio::test]
        async fn test_failed_load_is_not_cached() {
            let (status, cache, body) = get("/?cursor=not-a-cursor").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache, None);
            assert!(!body.contains("data-src="));
        }

        #[tokio::test]
        async fn test_rows_carry_data_src() {
            let (_, _, body) = get("/index").await;
            assert!(body.contains(r#"data-src="https://img.example/fuji.jpg""#));
            assert!(body.contains(r#"data-src="Null""#));
            assert!(body.contains("snow on the summit"));
        }
    }
}
