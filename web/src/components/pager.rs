//! Previous/next page buttons.

use gallery_common::viewer::{PageRequest, Pager};
use leptos::prelude::*;

/// Pager buttons with the current page number between them.  Each button
/// disables and dims itself on the first/last page.
#[component]
pub fn PagerControls(
    /// Pager state, settled against the page currently shown.
    #[prop(into)]
    pager: Signal<Pager>,
    /// Invoked with the request when an enabled button is pressed.
    on_request: Callback<PageRequest>,
) -> impl IntoView {
    let prev_disabled = move || pager.with(Pager::prev_disabled);
    let next_disabled = move || pager.with(Pager::next_disabled);

    view! {
        <div class="pager">
            <button
                id="prevButton"
                class="pager-button"
                class:dimmed=prev_disabled
                disabled=prev_disabled
                data-event={PageRequest::Prev.event_name()}
                on:click=move |_| on_request.run(PageRequest::Prev)
            >
                "← Newer"
            </button>
            <span id="currentPageNumber" class="page-number">
                {move || pager.with(Pager::current_label)}
            </span>
            <button
                id="nextButton"
                class="pager-button"
                class:dimmed=next_disabled
                disabled=next_disabled
                data-event={PageRequest::Next.event_name()}
                on:click=move |_| on_request.run(PageRequest::Next)
            >
                "Older →"
            </button>
        </div>
    }
}
