//! Stacked area chart: cumulative layers over the sorted union of years.

use super::{draw_legend, padded_range, palette, Chart, ChartError, ChartLabels, FONT};
use crate::data::{AlignedSeries, ChartRequest, Dataset, RowMerge, SeriesExtractor};
use plotters::coord::Shift;
use plotters::prelude::*;

pub struct AreaChart {
    pub request: ChartRequest,
    pub merge: RowMerge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaPlot {
    pub aligned: AlignedSeries,
    /// Running totals per layer; the last layer is the top edge of the stack.
    pub stacked: Vec<Vec<f64>>,
}

/// Cumulative sums of equally long layers, bottom layer first.
pub fn stack_layers(layers: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut running: Vec<f64> = Vec::new();
    layers
        .iter()
        .map(|layer| {
            running.resize(layer.len(), 0.0);
            for (acc, v) in running.iter_mut().zip(layer) {
                *acc += v;
            }
            running.clone()
        })
        .collect()
}

impl AreaChart {
    pub fn new(request: ChartRequest, merge: RowMerge) -> Self {
        Self { request, merge }
    }
}

impl Chart for AreaChart {
    type Plot = AreaPlot;

    fn name(&self) -> &'static str {
        "area"
    }

    fn default_labels(&self) -> ChartLabels {
        ChartLabels::new(
            format!(
                "Stacked Area Plot for {} ({})",
                self.request.indicator, self.request.years
            ),
            "Year",
            "Percentage of Total",
        )
    }

    fn prepare(&self, dataset: &Dataset) -> Result<AreaPlot, ChartError> {
        let aligned = SeriesExtractor::aligned(
            dataset,
            &self.request.indicator,
            &self.request.years,
            &self.request.entities,
            self.merge,
        )?;
        let layers: Vec<Vec<f64>> = aligned.layers.iter().map(|s| s.values()).collect();
        Ok(AreaPlot {
            stacked: stack_layers(&layers),
            aligned,
        })
    }

    fn draw<DB: DrawingBackend>(
        &self,
        plot: &AreaPlot,
        area: &DrawingArea<DB, Shift>,
        labels: &ChartLabels,
    ) -> Result<(), ChartError> {
        let (w, _) = area.dim_in_pixel();
        let (plot_area, legend_area) = area.split_horizontally((w as f64 * 0.78) as i32);

        let years = &plot.aligned.years;
        let x_range = padded_range(years.iter().map(|&y| y as f64), 0.0);
        let top = plot.stacked.last().cloned().unwrap_or_default();
        let y_range = padded_range(top.into_iter().chain(std::iter::once(0.0)), 0.05);
        let y_range = 0.0_f64.min(y_range.start)..y_range.end;

        let mut builder = ChartBuilder::on(&plot_area);
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

        // Highest running total first so lower layers paint over it
        for (i, totals) in plot.stacked.iter().enumerate().rev() {
            let color = palette::series_color(i);
            chart
                .draw_series(
                    AreaSeries::new(
                        years.iter().zip(totals).map(|(&y, &v)| (y as f64, v)),
                        0.0,
                        color.mix(0.85).filled(),
                    )
                    .border_style(color.stroke_width(1)),
                )
                .map_err(ChartError::drawing)?;
        }

        let entries: Vec<(String, RGBColor)> = plot
            .aligned
            .layers
            .iter()
            .enumerate()
            .map(|(i, s)| (s.entity.clone(), palette::series_color(i)))
            .collect();
        draw_legend(&legend_area, &entries, (8, 50))?;

        log::debug!(
            "Drew stacked area: {} layers over {} years",
            plot.stacked.len(),
            years.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::render_standalone;

    fn dataset(rows: &[[&str; 5]]) -> Dataset {
        let columns = ["Indicator Name", "Year", "United States", "China", "India"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        Dataset::from_records(columns, rows).unwrap()
    }

    #[test]
    fn stack_layers_accumulates() {
        let stacked = stack_layers(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![0.5, 0.5]]);
        assert_eq!(
            stacked,
            vec![vec![1.0, 2.0], vec![4.0, 6.0], vec![4.5, 6.5]]
        );
        assert!(stack_layers(&[]).is_empty());
    }

    #[test]
    fn interleaved_rows_give_sorted_axis() {
        let ds = dataset(&[
            ["Coal", "2002", "50", "78", "68"],
            ["Gas", "2001", "1", "1", "1"],
            ["Coal", "2000", "52.9", "78.2", "67.2"],
            ["Coal", "2001", "51", "79", "67"],
        ]);
        let entities = vec!["United States".to_string(), "China".to_string()];
        let chart = AreaChart::new(
            ChartRequest::range("Coal", 2000, 2010, &entities),
            RowMerge::Sum,
        );
        let plot = chart.prepare(&ds).unwrap();

        assert_eq!(plot.aligned.years, vec![2000, 2001, 2002]);
        assert_eq!(plot.aligned.layers[0].values(), vec![52.9, 51.0, 50.0]);
        assert_eq!(plot.stacked[1], vec![52.9 + 78.2, 51.0 + 79.0, 50.0 + 78.0]);
    }

    #[test]
    fn absent_entities_are_skipped() {
        let ds = dataset(&[["Coal", "2000", "1", "2", "3"]]);
        let entities = vec!["Germany".to_string(), "India".to_string()];
        let plot = AreaChart::new(ChartRequest::range("Coal", 2000, 2010, &entities), RowMerge::Sum)
            .prepare(&ds)
            .unwrap();

        assert_eq!(plot.aligned.layers.len(), 1);
        assert_eq!(plot.aligned.layers[0].entity, "India");
    }

    #[test]
    fn range_without_rows_renders_empty_stack() {
        let ds = dataset(&[["Coal", "1990", "1", "2", "3"]]);
        let entities = vec!["United States".to_string(), "India".to_string()];
        let chart = AreaChart::new(ChartRequest::range("Coal", 2000, 2010, &entities), RowMerge::Sum);

        let (_, plot) = render_standalone(&chart, &ds, (400, 300)).unwrap();
        assert!(plot.aligned.years.is_empty());
        assert!(plot.stacked.iter().all(Vec::is_empty));
    }

    #[test]
    fn title_spells_out_the_range() {
        let chart = AreaChart::new(ChartRequest::range("Coal", 2000, 2010, &[]), RowMerge::Sum);
        assert_eq!(
            chart.default_labels().title,
            "Stacked Area Plot for Coal (2000 to 2010)"
        );
    }
}
