//! Bar Chart Component
//!
//! Draws a [`ChartLayout`] on an HTML5 canvas.

use leptos::*;
use table_chart::chart::{ChartLayout, ChartSize};
use table_chart::ChartPoint;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const LABEL: &str = "#9ca3af"; // gray-400
const BAR: &str = "#FF9800";

/// One bar per point, `x` against `y`
#[component]
pub fn BarChart(points: Vec<ChartPoint>) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let size = ChartSize::default();
    let layout = ChartLayout::compute(&points, size);

    if layout.skipped > 0 {
        tracing::warn!("{} points lack a numeric x or y and were not drawn", layout.skipped);
    }

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &layout);
        }
    });

    view! {
        <canvas
            node_ref=canvas_ref
            width=size.width.to_string()
            height=size.height.to_string()
        />
    }
}

/// Draw the layout on canvas
fn draw_chart(canvas: &HtmlCanvasElement, layout: &ChartLayout) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = layout.size.width;
    let height = layout.size.height;
    let plot = layout.plot;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if layout.bars.is_empty() {
        ctx.set_fill_style(&LABEL.into());
        ctx.set_font("14px sans-serif");
        let _ = ctx.fill_text("No data", width / 2.0 - 25.0, height / 2.0);
        return;
    }

    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    for line in layout.gridlines() {
        ctx.begin_path();
        ctx.move_to(line.from.0, line.from.1);
        ctx.line_to(line.to.0, line.to.1);
        ctx.stroke();
    }

    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("11px sans-serif");
    for tick in &layout.y_ticks {
        let _ = ctx.fill_text(&tick.label, 4.0, tick.position + 4.0);
    }

    ctx.set_fill_style(&BAR.into());
    for bar in &layout.bars {
        ctx.fill_rect(bar.left, bar.top, bar.width, bar.height);
    }

    // Axes
    ctx.set_stroke_style(&LABEL.into());
    ctx.begin_path();
    ctx.move_to(plot.left, plot.top);
    ctx.line_to(plot.left, plot.bottom());
    ctx.line_to(plot.right(), plot.bottom());
    ctx.stroke();

    ctx.set_fill_style(&LABEL.into());
    for tick in &layout.x_ticks {
        let label_width = ctx
            .measure_text(&tick.label)
            .map(|m| m.width())
            .unwrap_or(0.0);
        let _ = ctx.fill_text(
            &tick.label,
            tick.position - label_width / 2.0,
            plot.bottom() + 16.0,
        );
    }
}
