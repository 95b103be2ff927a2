//! Charts module - chart models and rendering
//!
//! Every chart splits into `prepare`, which turns the dataset into a plot
//! model, and `draw`, which renders that model onto any plotters drawing
//! area. `render_on` draws into a caller's area; `render_standalone` creates
//! a fresh canvas when the caller has none.

mod area;
mod bar;
mod canvas;
mod donut;
mod line;
pub mod palette;

pub use area::{stack_layers, AreaChart, AreaPlot};
pub use bar::{bar_offsets, BarChart, BarPlot, BAR_WIDTH};
pub use canvas::Canvas;
pub use donut::{wedges, DonutChart, DonutPlot, Wedge};
pub use line::{LineChart, LinePlot};

use crate::data::{Dataset, ExtractError};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::ops::Range;
use thiserror::Error;

pub const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image output failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub fn drawing(err: impl Display) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

/// Title and axis descriptions drawn with a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
}

impl ChartLabels {
    pub fn new(title: impl Into<String>, x_desc: &str, y_desc: &str) -> Self {
        Self {
            title: title.into(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
        }
    }

    /// A short caption with blank axis descriptions.
    pub fn caption(title: impl Into<String>) -> Self {
        Self::new(title, "", "")
    }
}

/// A chart that can be built from a dataset and drawn on any backend.
pub trait Chart {
    type Plot;

    /// File stem used when the chart is written on its own.
    fn name(&self) -> &'static str;

    /// Title and axis labels generated from the request.
    fn default_labels(&self) -> ChartLabels;

    fn prepare(&self, dataset: &Dataset) -> Result<Self::Plot, ChartError>;

    fn draw<DB: DrawingBackend>(
        &self,
        plot: &Self::Plot,
        area: &DrawingArea<DB, Shift>,
        labels: &ChartLabels,
    ) -> Result<(), ChartError>;
}

/// Prepare and draw a chart into an existing area, returning the plot model.
pub fn render_on<C: Chart, DB: DrawingBackend>(
    chart: &C,
    dataset: &Dataset,
    area: &DrawingArea<DB, Shift>,
    labels: &ChartLabels,
) -> Result<C::Plot, ChartError> {
    let plot = chart.prepare(dataset)?;
    chart.draw(&plot, area, labels)?;
    Ok(plot)
}

/// Render a chart on a new white canvas with its default labels.
pub fn render_standalone<C: Chart>(
    chart: &C,
    dataset: &Dataset,
    size: (u32, u32),
) -> Result<(Canvas, C::Plot), ChartError> {
    let mut canvas = Canvas::new(size.0, size.1);
    let plot = {
        let root = canvas.area();
        root.fill(&WHITE).map_err(ChartError::drawing)?;
        let plot = render_on(chart, dataset, &root, &chart.default_labels())?;
        root.present().map_err(ChartError::drawing)?;
        plot
    };
    Ok((canvas, plot))
}

/// Axis range covering `values` with a little headroom.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let margin = (max - min) * pad;
    (min - margin)..(max + margin)
}

/// Colored boxes with labels stacked downward from `origin`.
pub(crate) fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[(String, RGBColor)],
    origin: (i32, i32),
) -> Result<(), ChartError> {
    let text_style = TextStyle::from((FONT, 14.0).into_font())
        .color(&palette::TEXT)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let (x, mut y) = origin;

    for (label, color) in entries {
        area.draw(&Rectangle::new(
            [(x, y - 6), (x + 12, y + 6)],
            color.filled(),
        ))
        .map_err(ChartError::drawing)?;
        area.draw(&Text::new(label.clone(), (x + 18, y), text_style.clone()))
            .map_err(ChartError::drawing)?;
        y += 22;
    }
    Ok(())
}

/// The area below the title, or the whole area when there is no title.
pub(crate) fn titled_area<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
) -> Result<DrawingArea<DB, Shift>, ChartError> {
    if title.is_empty() {
        return Ok(area.margin(0, 0, 0, 0));
    }
    area.titled(title, (FONT, 22.0).into_font())
        .map_err(ChartError::drawing)
}
