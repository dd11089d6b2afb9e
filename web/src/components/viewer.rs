//! Floating hover preview and the persistent jumbo viewer.

use gallery_common::viewer::Viewer;
use leptos::prelude::*;

/// Width of the preview thumbnail, in CSS pixels.
const PREVIEW_WIDTH: &str = "200";

/// Preview that follows the pointer while a row is hovered.
///
/// The `<img>` is only created once a row with an image has been hovered,
/// and is hidden rather than removed when the pointer leaves.
#[component]
pub fn HoverPreview(viewer: RwSignal<Viewer>) -> impl IntoView {
    let previewing = move || viewer.with(Viewer::is_previewing);
    let left = move || format!("{}px", viewer.with(|v| v.position().0));
    let top = move || format!("{}px", viewer.with(|v| v.position().1));

    view! {
        <div
            id="popup"
            class="popup"
            class:hidden=move || !previewing()
            class:visible=previewing
            style:left=left
            style:top=top
        >
            <Show when=move || viewer.with(|v| v.preview_element().is_some())>
                <img
                    class="popup-img"
                    width=PREVIEW_WIDTH
                    src=move || viewer.with(|v| v.preview_element().unwrap_or_default().to_string())
                    alt=""
                />
            </Show>
        </div>
    }
}

/// Large image updated on row click.
#[component]
pub fn JumboViewer(viewer: RwSignal<Viewer>) -> impl IntoView {
    view! {
        <div class="jumbo">
            <img
                id="jumboImg"
                class="jumbo-img"
                src=move || viewer.with(|v| v.jumbo().map(String::from))
                alt=""
            />
            <Show when=move || viewer.with(|v| v.jumbo().is_none())>
                <p class="jumbo-hint">"Click a row to view the photograph."</p>
            </Show>
        </div>
    }
}
