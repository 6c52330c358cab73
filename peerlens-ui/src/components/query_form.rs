//! Query Form Component
//!
//! Free-text question and the submit control.

use leptos::ev::SubmitEvent;
use leptos::*;

use crate::api;
use crate::state::GlobalState;

/// Comparison query form
#[component]
pub fn QueryForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let controller = state.controller;

    let in_flight = create_memo(move |_| controller.with(|c| c.in_flight));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let Some(request) = state.begin_submit() else {
            return;
        };

        spawn_local(async move {
            let outcome = api::compare(&request).await;
            if let Err(e) = &outcome {
                web_sys::console::error_1(&format!("Comparison failed: {}", e).into());
            }
            state.update(|c| c.complete(outcome));
        });
    };

    view! {
        <form id="query-form" class="query-form" on:submit=on_submit>
            <input
                id="query-input"
                type="text"
                placeholder="e.g. Revenue, EBITDA and net debt for FY24"
                required
                prop:value=move || controller.with(|c| c.query.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    controller.update(|c| c.query = value);
                }
            />
            <button
                id="submit-button"
                type="submit"
                prop:disabled=move || in_flight.get()
            >
                {move || if in_flight.get() { "Comparing..." } else { "Compare" }}
            </button>
        </form>
    }
}
