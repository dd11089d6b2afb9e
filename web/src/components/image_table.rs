//! Table of images, one row per record, wired to the hover preview and the
//! jumbo viewer.

use gallery_common::model::ImageItem;
use gallery_common::viewer::Viewer;
use leptos::ev::MouseEvent;
use leptos::prelude::*;

/// Gallery table.  Pointer movement anywhere in the table repositions the
/// preview while one is showing.
#[component]
pub fn ImageTable(items: Vec<ImageItem>, viewer: RwSignal<Viewer>) -> impl IntoView {
    let empty = items.is_empty();

    view! {
        <table
            id="galleryTable"
            class="gallery-table"
            on:mousemove=move |ev: MouseEvent| {
                viewer.update(|v| v.pointer_move(ev.page_x(), ev.page_y()))
            }
        >
            <tbody>
                {items
                    .into_iter()
                    .map(|item| view! { <ImageRow item=item viewer=viewer/> })
                    .collect_view()}
            </tbody>
        </table>
        <Show when=move || empty>
            <p class="empty">"No photographs to show."</p>
        </Show>
    }
}

/// A single row.  `data-src` carries the image URL, or the sentinel for
/// records without one.
#[component]
fn ImageRow(item: ImageItem, viewer: RwSignal<Viewer>) -> impl IntoView {
    let src = item.data_src().to_string();
    let enter_src = src.clone();
    let click_src = src.clone();
    let date = item.display_date();

    view! {
        <tr
            class="gallery-row"
            data-src=src
            on:mouseenter=move |ev: MouseEvent| {
                viewer.update(|v| {
                    v.pointer_enter(&enter_src, ev.page_x(), ev.page_y());
                })
            }
            on:mouseleave=move |_| viewer.update(Viewer::pointer_leave)
            on:click=move |_| {
                viewer.update(|v| {
                    v.click(&click_src);
                })
            }
        >
            <td class="haiku-line">{item.line1}</td>
            <td class="haiku-line">{item.line2}</td>
            <td class="haiku-line">{item.line3}</td>
            <td class="created">{date}</td>
        </tr>
    }
}
