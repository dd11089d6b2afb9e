//! About page.

use leptos::prelude::*;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="about-page">
            <h1>"About"</h1>
            <p>
                "A personal collection of photographs. Each picture is paired with a "
                "haiku; hover a row to preview the photograph and click it to open "
                "the large view."
            </p>
            <a href="/" class="back-link">"← Back to the photos"</a>
        </div>
    }
}
