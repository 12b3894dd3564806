// ============================================================
// Layer 6 — Accuracy Plot
// ============================================================
// Draws validation accuracy against epoch for one or more runs
// into a single SVG, one coloured line per run with its label in
// the legend. The y-axis is fitted to the data with a small
// margin so close curves stay distinguishable.
//
// Reference: plotters documentation (SVGBackend, LineSeries)

use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;

/// One labelled line: accuracy per epoch, epoch 0 first.
#[derive(Debug, Clone)]
pub struct AccuracySeries {
    pub label:  String,
    pub points: Vec<f32>,
}

impl AccuracySeries {
    pub fn new(label: impl Into<String>, points: Vec<f32>) -> Self {
        Self { label: label.into(), points }
    }
}

const SIZE: (u32, u32) = (900, 600);

pub fn plot_accuracy(series: &[AccuracySeries], output: &Path) -> Result<()> {
    if series.is_empty() {
        bail!("Nothing to plot: no runs given");
    }

    let epochs = series.iter().map(|s| s.points.len()).max().unwrap_or(0);
    let x_max  = epochs.saturating_sub(1).max(1) as f32;
    let (y_min, y_max) = y_range(series);

    let root = SVGBackend::new(output, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f32..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Validation accuracy")
        .draw()?;

    for (i, run) in series.iter().enumerate() {
        let colour = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                run.points.iter().enumerate().map(|(e, &acc)| (e as f32, acc)),
                colour.stroke_width(2),
            ))?
            .label(run.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    tracing::info!("Wrote accuracy plot to '{}'", output.display());
    Ok(())
}

/// Data range padded by 5%, falling back to [0, 1].
fn y_range(series: &[AccuracySeries]) -> (f32, f32) {
    let values = series.iter().flat_map(|s| s.points.iter().copied()).filter(|v| v.is_finite());
    let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let margin = ((hi - lo) * 0.05).max(0.01);
    (lo - margin, hi + margin)
}
