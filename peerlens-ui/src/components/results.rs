//! Results Component
//!
//! Comparison table, graph toggle, chart-kind selector and chart.

use leptos::*;

use crate::components::Chart;
use crate::state::controller::NO_DATA_MESSAGE;
use crate::state::{ChartKind, GlobalState, TableView};

/// Results area; hidden until a comparison has been rendered
#[component]
pub fn Results() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let controller = state.controller;

    let visible = create_memo(move |_| controller.with(|c| c.results_visible));
    let show_graph = create_memo(move |_| controller.with(|c| c.show_graph));
    let table = create_memo(move |_| {
        controller.with(|c| c.results.as_ref().map(|r| r.table.clone()))
    });

    view! {
        <section id="results-area" class="results" class:hidden=move || !visible.get()>
            <div id="table-container" class="table-container">
                {move || table.get().map(render_table)}
            </div>

            <div class="chart-controls">
                <label>
                    <input
                        id="graph-toggle"
                        type="checkbox"
                        prop:checked=move || show_graph.get()
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            state.update(|c| c.toggle_graph(checked));
                        }
                    />
                    "Show graph"
                </label>
                <select
                    on:change=move |ev| {
                        let kind = ChartKind::parse(&event_target_value(&ev));
                        state.update(|c| c.set_chart_kind(kind));
                    }
                >
                    <option value="bar" selected=true>"Bar"</option>
                    <option value="line">"Line"</option>
                </select>
            </div>

            <div
                id="graph-container"
                class="graph-container"
                style:display=move || if show_graph.get() { "block" } else { "none" }
            >
                <Chart />
            </div>
        </section>
    }
}

fn render_table(table: TableView) -> View {
    match table {
        TableView::Empty => view! { <p>{NO_DATA_MESSAGE}</p> }.into_view(),
        TableView::Table { headers, rows } => view! {
            <table>
                <thead>
                    <tr>
                        {headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| view! {
                            <tr>
                                {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_view(),
    }
}
