//! Gallery Web – Leptos site showing the photo table, hover preview and
//! jumbo viewer.

pub mod app;
pub mod components;
pub mod pages;

/// Entry-point called from the WASM bundle to hydrate the server-rendered HTML.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
