//! Competitor List Component
//!
//! Checkbox per selectable competitor plus a select-all toggle.

use leptos::*;

use crate::state::{CompanyList, GlobalState};

/// Competitor checkboxes
#[component]
pub fn CompetitorList() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let controller = state.controller;

    let all_selected = create_memo(move |_| controller.with(|c| c.all_selected()));
    let companies = state.companies();

    view! {
        <section class="competitors">
            <div class="competitors-header">
                <h2>"Competitors"</h2>
                <label class="select-all">
                    <input
                        type="checkbox"
                        prop:checked=move || all_selected.get()
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            state.update(|c| c.toggle_select_all(checked));
                        }
                    />
                    "Select all"
                </label>
            </div>

            <div id="competitor-list" class="competitor-list">
                {move || match companies.get() {
                    CompanyList::Loading => view! {
                        <p class="muted">"Loading companies..."</p>
                    }.into_view(),
                    CompanyList::Failed(message) => view! {
                        <p class="error">{format!("Error: {}", message)}</p>
                    }.into_view(),
                    CompanyList::Loaded(list) if list.is_empty() => view! {
                        <p class="muted">"No competitors available. Ingest reports first."</p>
                    }.into_view(),
                    CompanyList::Loaded(list) => list
                        .into_iter()
                        .map(|competitor| {
                            let name = competitor.name.clone();
                            let input_id = format!("company-{}", competitor.name);
                            view! {
                                <div class="competitor-item">
                                    <input
                                        type="checkbox"
                                        id=input_id.clone()
                                        name="competitor"
                                        value=competitor.name.clone()
                                        prop:checked=competitor.checked
                                        on:change=move |ev| {
                                            let checked = event_target_checked(&ev);
                                            state.update(|c| c.set_competitor(&name, checked));
                                        }
                                    />
                                    <label for=input_id>{competitor.name}</label>
                                </div>
                            }
                        })
                        .collect_view(),
                }}
            </div>
        </section>
    }
}
