//! Sample series plots
//!
//! Latency against execution index, with outliers in a separate colour and the
//! Tukey fences drawn across. Spikes that line up with periodic allocator or
//! scheduler activity show up as a regular pattern here.

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::error::{HarnessError, Result};
use crate::stats::sample::SampleSet;
use crate::stats::statistics::Statistics;

#[derive(Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub line_color: RGBColor,
    pub outlier_color: RGBColor,
    pub fence_color: RGBColor,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 600,
            title: "Samples".to_string(),
            line_color: BLUE,
            outlier_color: RED,
            fence_color: RGBColor(128, 128, 128),
        }
    }
}

/// Write an SVG (`.svg`) or bitmap (anything else) plot of `samples`.
pub fn plot_samples(
    samples: &SampleSet,
    stats: &Statistics,
    output_path: impl AsRef<Path>,
    config: Option<&PlotConfig>,
) -> Result<()> {
    let owned_config = config.cloned().unwrap_or_default();
    let path = output_path.as_ref();
    let size = (owned_config.width, owned_config.height);

    let drawn = if path.extension().is_some_and(|e| e == "svg") {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_on_area(&root, samples, stats, &owned_config)
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_on_area(&root, samples, stats, &owned_config)
    };
    drawn.map_err(|e| HarnessError::Plot(e.to_string()))
}

fn draw_on_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    samples: &SampleSet,
    stats: &Statistics,
    config: &PlotConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let points: Vec<(usize, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.as_nanos() as f64))
        .collect();

    let x_max = points.len().max(2) - 1;
    let y_top = (stats.max as f64).max(stats.upper_fence());
    let y_max = if y_top > 0.0 { y_top * 1.1 } else { 1.0 };

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 30.0).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("Duration (ns)")
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), config.line_color.stroke_width(1)))?;

    for fence in [stats.lower_fence(), stats.upper_fence()] {
        if (0.0..=y_max).contains(&fence) {
            chart.draw_series(LineSeries::new(
                vec![(0, fence), (x_max, fence)],
                config.fence_color.stroke_width(1),
            ))?;
        }
    }

    chart.draw_series(
        stats
            .outlier_indices
            .iter()
            .map(|&i| Circle::new(points[i], 4, config.outlier_color.filled())),
    )?;

    root.present()?;
    Ok(())
}
