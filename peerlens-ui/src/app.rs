//! App Root Component
//!
//! Main application component with global providers and the initial
//! company fetch.

use leptos::*;

use crate::api;
use crate::components::{CompetitorList, LoadingOverlay, QueryForm, Results};
use crate::state::controller::BASE_COMPANY;
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Populate the competitor list once on mount
    spawn_local(async move {
        let outcome = api::fetch_companies().await;
        if let Err(e) = &outcome {
            web_sys::console::error_1(&format!("Failed to fetch companies: {}", e).into());
        }
        state.update(|c| c.companies_loaded(outcome));
    });

    let in_flight = Signal::derive(move || state.controller.with(|c| c.in_flight));

    view! {
        <div class="app">
            <header class="app-header">
                <h1>"PeerLens"</h1>
                <p class="muted">{format!("Compare {} against its competitors", BASE_COMPANY)}</p>
            </header>

            <main class="app-main">
                <CompetitorList />
                <QueryForm />
                <Results />
            </main>

            <LoadingOverlay loading=in_flight />
        </div>
    }
}
