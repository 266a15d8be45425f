//! Chart renderers: terminal bars for the text report and SVG files via `plotters`.

use std::{fmt::Write as _, path::Path};

use anyhow::{Context, Result};
use log::info;
use plotters::prelude::*;

use crate::{
    chart::BarChart,
    data::format_number,
    table::display_width,
};

const BAR_WIDTH: usize = 40;
const LABEL_MAX_CHARS: usize = 32;
const SVG_SIZE: (u32, u32) = (900, 600);

/// Draws `chart` as horizontal terminal bars, one line per product.
///
/// Negative values use a lighter glyph so losses stand out next to gains.
pub fn render_text(chart: &BarChart) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", chart.title);
    let _ = writeln!(output, "{} por {}", chart.y_title, chart.x_title);

    let labels = chart
        .bars
        .iter()
        .map(|bar| truncate_label(&bar.label))
        .collect::<Vec<_>>();
    let label_width = labels.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let peak = chart
        .bars
        .iter()
        .map(|bar| bar.value.abs())
        .fold(0.0_f64, f64::max);

    for (bar, label) in chart.bars.iter().zip(&labels) {
        let cells = if peak > 0.0 {
            ((bar.value.abs() / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = if bar.value < 0.0 { "░" } else { "█" };
        let padding = " ".repeat(label_width.saturating_sub(display_width(label)));
        let mut line = format!(
            "  {label}{padding}  {}{}",
            glyph.repeat(cells),
            " ".repeat(BAR_WIDTH - cells.min(BAR_WIDTH))
        );
        if chart.show_values || bar.value < 0.0 {
            let _ = write!(line, "  {}", format_number(bar.value));
        }
        let _ = writeln!(output, "{}", line.trim_end());
    }
    output
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        label.to_string()
    } else {
        let head = label.chars().take(LABEL_MAX_CHARS - 1).collect::<String>();
        format!("{head}…")
    }
}

/// Writes `chart` as an SVG bar chart with rotated category labels.
pub fn write_svg(chart: &BarChart, path: &Path) -> Result<()> {
    draw_svg(chart, path).with_context(|| format!("Rendering chart to {path:?}"))?;
    info!("Chart '{}' written to {:?}", chart.title, path);
    Ok(())
}

fn draw_svg(chart: &BarChart, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, SVG_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (min, max) = chart.value_range();
    let headroom = (max - min) * 0.1;
    let bottom = if min < 0.0 { min - headroom } else { min };
    let top = if max > 0.0 { max + headroom } else { max };
    let count = chart.bars.len();

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24.0).into_font())
        .margin(20)
        .x_label_area_size(180)
        .y_label_area_size(80)
        .build_cartesian_2d((0..count).into_segmented(), bottom..top)?;

    let labels = chart
        .bars
        .iter()
        .map(|bar| truncate_label(&bar.label))
        .collect::<Vec<_>>();
    let tick_font = f64::from(chart.tick_font_size);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_title.as_str())
        .y_desc(chart.y_title.as_str())
        .x_labels(count)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => {
                labels.get(*idx).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .x_label_style(
            ("sans-serif", tick_font)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .axis_desc_style(("sans-serif", 14.0))
        .draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BLUE.mix(0.75).filled())
            .margin(12)
            .data(chart.bars.iter().enumerate().map(|(idx, bar)| (idx, bar.value))),
    )?;

    if chart.show_values {
        ctx.draw_series(chart.bars.iter().enumerate().map(|(idx, bar)| {
            Text::new(
                format_number(bar.value),
                (SegmentValue::CenterOf(idx), bar.value),
                ("sans-serif", 12.0).into_font(),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}
