//! Loading Component
//!
//! Overlay shown while a comparison is in flight.

use leptos::*;

/// Full-page loading overlay
#[component]
pub fn LoadingOverlay(
    #[prop(into)]
    loading: Signal<bool>,
) -> impl IntoView {
    view! {
        <div id="loading-overlay" class="loading-overlay" class:hidden=move || !loading.get()>
            <div class="loading-spinner" />
            <p>"Analyzing annual reports..."</p>
        </div>
    }
}
