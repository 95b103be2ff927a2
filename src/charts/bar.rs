//! Grouped bar chart: one cluster per entity, one bar per selected year.

use super::{padded_range, palette, Chart, ChartError, ChartLabels, FONT};
use crate::data::{Dataset, GroupedTotals, RowMerge, SeriesExtractor};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Bar width in x-axis units; entity ticks are one unit apart.
pub const BAR_WIDTH: f64 = 0.2;

pub struct BarChart {
    pub indicator: String,
    pub years: Vec<i32>,
    pub entities: Vec<String>,
    pub merge: RowMerge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPlot {
    pub totals: GroupedTotals,
    /// Center offset of each year's bar from its entity tick.
    pub offsets: Vec<f64>,
}

impl BarPlot {
    /// Height of the bar for `entity` and `year`, if one is drawn.
    pub fn height(&self, entity: &str, year: i32) -> Option<f64> {
        let e = self.totals.entities.iter().position(|x| x == entity)?;
        let y = self.totals.years.iter().position(|&x| x == year)?;
        self.totals.cells[e][y]
    }
}

/// Offsets that center `count` adjacent bars of `width` on zero.
pub fn bar_offsets(count: usize, width: f64) -> Vec<f64> {
    let half_span = (count.saturating_sub(1)) as f64 / 2.0;
    (0..count)
        .map(|i| (i as f64 - half_span) * width)
        .collect()
}

impl BarChart {
    pub fn new(indicator: &str, years: &[i32], entities: &[String], merge: RowMerge) -> Self {
        Self {
            indicator: indicator.to_string(),
            years: years.to_vec(),
            entities: entities.to_vec(),
            merge,
        }
    }
}

impl Chart for BarChart {
    type Plot = BarPlot;

    fn name(&self) -> &'static str {
        "bar"
    }

    fn default_labels(&self) -> ChartLabels {
        ChartLabels::new(
            format!("Grouped Bar Plot for {} (Selected Years)", self.indicator),
            "Country",
            "Value",
        )
    }

    fn prepare(&self, dataset: &Dataset) -> Result<BarPlot, ChartError> {
        let totals = SeriesExtractor::grouped_totals(
            dataset,
            &self.indicator,
            &self.years,
            &self.entities,
            self.merge,
        )?;
        Ok(BarPlot {
            offsets: bar_offsets(totals.years.len(), BAR_WIDTH),
            totals,
        })
    }

    fn draw<DB: DrawingBackend>(
        &self,
        plot: &BarPlot,
        area: &DrawingArea<DB, Shift>,
        labels: &ChartLabels,
    ) -> Result<(), ChartError> {
        let totals = &plot.totals;
        let groups = totals.entities.len().max(1) as f64;
        let values = totals.cells.iter().flatten().flatten().copied();
        let y_range = padded_range(values.chain(std::iter::once(0.0)), 0.05);
        let y_range = y_range.start.min(0.0)..y_range.end;

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50);
        if !labels.title.is_empty() {
            builder.caption(&labels.title, (FONT, 20.0));
        }
        let mut chart = builder
            .build_cartesian_2d(-0.5..groups - 0.5, y_range)
            .map_err(ChartError::drawing)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_: &f64| String::new())
            .x_desc(labels.x_desc.as_str())
            .y_desc(labels.y_desc.as_str())
            .draw()
            .map_err(ChartError::drawing)?;

        let half = BAR_WIDTH / 2.0;
        for (yi, year) in totals.years.iter().enumerate() {
            let color = palette::series_color(yi);
            let offset = plot.offsets[yi];
            chart
                .draw_series(totals.cells.iter().enumerate().filter_map(|(ei, row)| {
                    row[yi].map(|value| {
                        let center = ei as f64 + offset;
                        Rectangle::new(
                            [(center - half, 0.0), (center + half, value)],
                            color.filled(),
                        )
                    })
                }))
                .map_err(ChartError::drawing)?
                .label(year.to_string())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        // Entity names under each cluster center
        let base = area.get_base_pixel();
        let tick_style = TextStyle::from((FONT, 14.0).into_font())
            .color(&palette::TEXT)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let y_floor = chart.y_range().start;
        for (ei, entity) in totals.entities.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(ei as f64, y_floor));
            area.draw(&Text::new(
                entity.clone(),
                (px - base.0, py - base.1 + 6),
                tick_style.clone(),
            ))
            .map_err(ChartError::drawing)?;
        }

        if !totals.years.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT, 13.0))
                .draw()
                .map_err(ChartError::drawing)?;
        }

        log::debug!(
            "Drew grouped bars: {} entities x {} years",
            totals.entities.len(),
            totals.years.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartError;
    use crate::data::ExtractError;

    fn dataset(rows: &[[&str; 4]]) -> Dataset {
        let columns = ["Indicator Name", "Year", "Brazil", "Germany"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        Dataset::from_records(columns, rows).unwrap()
    }

    fn entities() -> Vec<String> {
        vec!["Brazil".to_string(), "Germany".to_string()]
    }

    #[test]
    fn offsets_center_the_cluster() {
        let offsets = bar_offsets(5, 0.2);
        assert_eq!(offsets.len(), 5);
        assert!((offsets[0] + 0.4).abs() < 1e-9);
        assert!(offsets[2].abs() < 1e-9);
        assert!((offsets[4] - 0.4).abs() < 1e-9);
        assert_eq!(bar_offsets(1, 0.2), vec![0.0]);
        assert!(bar_offsets(0, 0.2).is_empty());
    }

    #[test]
    fn duplicate_rows_are_summed() {
        let ds = dataset(&[
            ["Hydro", "2002", "40", "1.5"],
            ["Hydro", "2002", "38.2", "1.8"],
            ["Hydro", "2004", "80", "3.3"],
        ]);
        let chart = BarChart::new("Hydro", &[2002, 2004], &entities(), RowMerge::Sum);
        let plot = chart.prepare(&ds).unwrap();

        assert!((plot.height("Brazil", 2002).unwrap() - 78.2).abs() < 1e-9);
        assert!((plot.height("Germany", 2002).unwrap() - 3.3).abs() < 1e-9);
        assert_eq!(plot.height("Germany", 2004), Some(3.3));
        assert_eq!(plot.offsets.len(), 2);
    }

    #[test]
    fn selection_without_rows_is_an_error() {
        let ds = dataset(&[["Hydro", "2002", "40", "1.5"]]);
        let chart = BarChart::new("Hydro", &[2010], &entities(), RowMerge::Sum);
        let err = chart.prepare(&ds).unwrap_err();
        assert!(matches!(
            err,
            ChartError::Extract(ExtractError::EmptySelection { .. })
        ));
    }

    #[test]
    fn years_without_rows_draw_no_bar() {
        let ds = dataset(&[["Hydro", "2002", "40", "1.5"]]);
        let chart = BarChart::new("Hydro", &[2002, 2006], &entities(), RowMerge::Sum);
        let plot = chart.prepare(&ds).unwrap();
        assert_eq!(plot.height("Brazil", 2006), None);
        assert_eq!(plot.height("Brazil", 2002), Some(40.0));
    }
}
