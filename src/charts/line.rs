//! Line chart: one line per entity over a year range.

use super::{padded_range, palette, Chart, ChartError, ChartLabels, FONT};
use crate::data::{ChartRequest, Dataset, Series, SeriesExtractor};
use plotters::coord::Shift;
use plotters::prelude::*;

pub struct LineChart {
    pub request: ChartRequest,
}

/// Series exactly as drawn, in row-encounter order.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn new(request: ChartRequest) -> Self {
        Self { request }
    }
}

impl Chart for LineChart {
    type Plot = LinePlot;

    fn name(&self) -> &'static str {
        "line"
    }

    fn default_labels(&self) -> ChartLabels {
        ChartLabels::new(
            format!("Line Plot for {}", self.request.indicator),
            "Year",
            "Value",
        )
    }

    fn prepare(&self, dataset: &Dataset) -> Result<LinePlot, ChartError> {
        let series = SeriesExtractor::extract(
            dataset,
            &self.request.indicator,
            &self.request.years,
            &self.request.entities,
        )?;
        Ok(LinePlot { series })
    }

    fn draw<DB: DrawingBackend>(
        &self,
        plot: &LinePlot,
        area: &DrawingArea<DB, Shift>,
        labels: &ChartLabels,
    ) -> Result<(), ChartError> {
        let points = plot.series.iter().flat_map(|s| s.points.iter());
        let x_range = padded_range(points.clone().map(|&(y, _)| y as f64), 0.0);
        let y_range = padded_range(points.map(|&(_, v)| v), 0.05);

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50);
        if !labels.title.is_empty() {
            builder.caption(&labels.title, (FONT, 20.0));
        }
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(ChartError::drawing)?;

        chart
            .configure_mesh()
            .x_desc(labels.x_desc.as_str())
            .y_desc(labels.y_desc.as_str())
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()
            .map_err(ChartError::drawing)?;

        for (i, series) in plot.series.iter().enumerate() {
            let color = palette::series_color(i);
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().map(|&(year, value)| (year as f64, value)),
                    color.stroke_width(2),
                ))
                .map_err(ChartError::drawing)?
                .label(series.entity.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        if !plot.series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT, 13.0))
                .draw()
                .map_err(ChartError::drawing)?;
        }

        log::debug!("Drew line chart with {} series", plot.series.len());
        Ok(())
    }
}
