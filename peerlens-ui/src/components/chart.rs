//! Chart Component
//!
//! Bar/line comparison chart drawn on an HTML5 canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::{ChartKind, ChartSpec, GlobalState};

/// Chart colors for different series
const SERIES_COLORS: [&str; 6] = [
    "#1E88E5", // Blue (base company)
    "#FF9800", // Orange
    "#4CAF50", // Green
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

const UNDRAWABLE_MESSAGE: &str = "Chart data could not be drawn.";

/// Comparison chart component
#[component]
pub fn Chart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let controller = state.controller;
    let canvas_ref = create_node_ref::<html::Canvas>();

    let revision = create_memo(move |_| controller.with(|c| c.results_revision));
    let kind = create_memo(move |_| controller.with(|c| c.chart_kind));

    // Redraw only for new results or a new chart kind
    create_effect(move |_| {
        let _ = revision.get();
        let kind = kind.get();

        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        controller.with_untracked(|c| {
            if let Some(results) = &c.results {
                let chart = ChartSpec::from_graph_data(&results.graph_data);
                draw_chart(&canvas, chart.as_ref(), kind, &results.chart_title());
            }
        });
    });

    view! {
        <canvas
            id="comparison-chart"
            node_ref=canvas_ref
            width="900"
            height="450"
            class="chart"
        />
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, data: Option<&ChartSpec>, kind: ChartKind, title: &str) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Clear canvas
    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    // Title
    ctx.set_fill_style(&"#111827".into());
    ctx.set_font("bold 16px sans-serif");
    ctx.set_text_align("center");
    let _ = ctx.fill_text(title, width / 2.0, 24.0);

    let Some(data) = data else {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("14px sans-serif");
        let _ = ctx.fill_text(UNDRAWABLE_MESSAGE, width / 2.0, height / 2.0);
        return;
    };

    // Legend on top
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("left");
    let mut legend_x = 60.0;
    for (idx, series) in data.series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        ctx.set_fill_style(&color.into());
        ctx.fill_rect(legend_x, 38.0, 12.0, 12.0);
        ctx.set_fill_style(&"#374151".into());
        let _ = ctx.fill_text(&series.label, legend_x + 16.0, 48.0);
        legend_x += 28.0 + series.label.chars().count() as f64 * 7.0;
    }

    // Margins
    let margin_left = 70.0;
    let margin_right = 20.0;
    let margin_top = 64.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    let (y_min, y_max) = data.y_bounds();
    let y_of = |value: f64| margin_top + (y_max - value) / (y_max - y_min) * chart_height;

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style(&"#e5e7eb".into());
    ctx.set_line_width(1.0);
    ctx.set_text_align("right");
    for i in 0..=5 {
        let value = y_min + (i as f64 / 5.0) * (y_max - y_min);
        let y = y_of(value);
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&format_tick(value), margin_left - 8.0, y + 4.0);
    }

    // X-axis category labels
    let slot = chart_width / data.labels.len() as f64;
    ctx.set_text_align("center");
    ctx.set_fill_style(&"#374151".into());
    for (i, label) in data.labels.iter().enumerate() {
        let x = margin_left + slot * (i as f64 + 0.5);
        let _ = ctx.fill_text(label, x, height - margin_bottom + 18.0);
    }

    let zero_y = y_of(0.0);
    let series_count = data.series.len() as f64;
    let bar_width = slot * 0.8 / series_count;

    for (idx, series) in data.series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        ctx.set_fill_style(&color.into());
        ctx.set_stroke_style(&color.into());

        match kind {
            ChartKind::Bar => {
                for (i, value) in series.values.iter().enumerate().take(data.labels.len()) {
                    let Some(value) = value else { continue };
                    let x = margin_left + slot * i as f64 + slot * 0.1 + bar_width * idx as f64;
                    let y = y_of(*value);
                    ctx.fill_rect(x, y.min(zero_y), bar_width, (zero_y - y).abs());
                }
            }
            ChartKind::Line => {
                ctx.set_line_width(2.0);
                ctx.begin_path();
                let mut pen_down = false;
                for (i, value) in series.values.iter().enumerate().take(data.labels.len()) {
                    let x = margin_left + slot * (i as f64 + 0.5);
                    match value {
                        Some(value) if pen_down => ctx.line_to(x, y_of(*value)),
                        Some(value) => {
                            ctx.move_to(x, y_of(*value));
                            pen_down = true;
                        }
                        None => pen_down = false,
                    }
                }
                ctx.stroke();

                for (i, value) in series.values.iter().enumerate().take(data.labels.len()) {
                    let Some(value) = value else { continue };
                    let x = margin_left + slot * (i as f64 + 0.5);
                    ctx.begin_path();
                    let _ = ctx.arc(x, y_of(*value), 3.0, 0.0, std::f64::consts::PI * 2.0);
                    ctx.fill();
                }
            }
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
