//! Root Leptos application component with routing.

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, MetaTags, Stylesheet, Title};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::{SsrMode, StaticSegment};

use crate::components::nav::Nav;
use crate::pages::{about::AboutPage, gallery::Gallery};

/// Server-side application state, provided as Leptos context for server functions.
#[derive(Clone, Debug)]
#[cfg(feature = "ssr")]
pub struct AppState {
    pub store: std::sync::Arc<gallery_server::store::Store>,
    pub config: std::sync::Arc<gallery_common::config::Config>,
}

/// Full site router: Leptos pages, static assets and the JSON API.
#[cfg(feature = "ssr")]
pub fn router(state: AppState, leptos_options: LeptosOptions) -> axum::Router {
    use leptos_axum::{generate_route_list, LeptosRoutes};

    let store = state.store.clone();
    let routes = generate_route_list(App);

    axum::Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            move || provide_context(state.clone()),
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        // Static assets (WASM bundle, CSS), otherwise the 404 page
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options)
        .merge(gallery_server::api::router(store))
}

/// HTML document wrapping the app during server-side rendering.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// The root `<App/>` component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/gallery-web.css"/>
        <Title text="Gallery"/>
        <Meta name="description" content="Photographs, each with a haiku"/>

        <Router>
            <Nav/>
            <main class="main-content">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=StaticSegment("") view=Gallery ssr=SsrMode::Async/>
                    <Route path=StaticSegment("index") view=Gallery ssr=SsrMode::Async/>
                    <Route path=StaticSegment("about") view=AboutPage/>
                </Routes>
            </main>
        </Router>
    }
}
