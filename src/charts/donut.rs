//! Donut chart: one ring slice per entity at a single year.

use super::{palette, titled_area, Chart, ChartError, ChartLabels, FONT};
use crate::data::{Dataset, EntitySchema, RowMerge, SeriesExtractor, Snapshot};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

/// Slices start at twelve o'clock and run counter-clockwise.
const START_ANGLE: f64 = 90.0;
/// Ring thickness as a share of the outer radius.
const RING_WIDTH: f64 = 0.4;

pub struct DonutChart {
    pub indicator: String,
    pub year: i32,
    pub schema: EntitySchema,
    pub merge: RowMerge,
}

/// Angular extent of one slice, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub end: f64,
    pub fraction: f64,
}

impl Wedge {
    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutPlot {
    pub slices: Vec<Snapshot>,
    pub wedges: Vec<Wedge>,
}

/// Slice angles for `values`. A non-positive total produces no wedges.
pub fn wedges(values: &[f64]) -> Vec<Wedge> {
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = START_ANGLE;
    values
        .iter()
        .map(|v| {
            let fraction = v.max(0.0) / total;
            let end = start + fraction * 360.0;
            let wedge = Wedge {
                start,
                end,
                fraction,
            };
            start = end;
            wedge
        })
        .collect()
}

fn polar(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let rad = degrees * PI / 180.0;
    (
        center.0 + (radius * rad.cos()).round() as i32,
        center.1 - (radius * rad.sin()).round() as i32,
    )
}

fn ring_segment(center: (i32, i32), outer: f64, inner: f64, wedge: &Wedge) -> Vec<(i32, i32)> {
    let steps = ((wedge.end - wedge.start).abs().ceil() as usize).max(1);
    let step = (wedge.end - wedge.start) / steps as f64;

    let mut points: Vec<(i32, i32)> = (0..=steps)
        .map(|i| polar(center, outer, wedge.start + step * i as f64))
        .collect();
    points.extend((0..=steps).rev().map(|i| polar(center, inner, wedge.start + step * i as f64)));
    points
}

impl DonutChart {
    pub fn new(indicator: &str, year: i32, schema: EntitySchema, merge: RowMerge) -> Self {
        Self {
            indicator: indicator.to_string(),
            year,
            schema,
            merge,
        }
    }
}

impl Chart for DonutChart {
    type Plot = DonutPlot;

    fn name(&self) -> &'static str {
        "donut"
    }

    fn default_labels(&self) -> ChartLabels {
        ChartLabels::new(
            format!("Donut Chart for {} in {}", self.indicator, self.year),
            "",
            "",
        )
    }

    fn prepare(&self, dataset: &Dataset) -> Result<DonutPlot, ChartError> {
        let slices = SeriesExtractor::snapshot(
            dataset,
            &self.indicator,
            self.year,
            &self.schema,
            self.merge,
        )?;
        if slices.is_empty() {
            log::warn!(
                "No rows for '{}' in {}; donut has no slices",
                self.indicator,
                self.year
            );
        }
        let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
        Ok(DonutPlot {
            wedges: wedges(&values),
            slices,
        })
    }

    fn draw<DB: DrawingBackend>(
        &self,
        plot: &DonutPlot,
        area: &DrawingArea<DB, Shift>,
        labels: &ChartLabels,
    ) -> Result<(), ChartError> {
        let body = titled_area(area, &labels.title)?;
        let (w, h) = body.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let outer = w.min(h) as f64 * 0.36;
        let inner = outer * (1.0 - RING_WIDTH);

        if plot.wedges.is_empty() && !plot.slices.is_empty() {
            // Entities exist but sum to zero: plain ring, no labels
            let full = Wedge {
                start: START_ANGLE,
                end: START_ANGLE + 360.0,
                fraction: 1.0,
            };
            body.draw(&Polygon::new(
                ring_segment(center, outer, inner, &full),
                palette::EMPTY_RING.filled(),
            ))
            .map_err(ChartError::drawing)?;
        }

        for (i, wedge) in plot.wedges.iter().enumerate() {
            if wedge.fraction <= 0.0 {
                continue;
            }
            body.draw(&Polygon::new(
                ring_segment(center, outer, inner, wedge),
                palette::donut_color(i).filled(),
            ))
            .map_err(ChartError::drawing)?;
        }

        // White separators between slices
        for wedge in &plot.wedges {
            body.draw(&PathElement::new(
                vec![
                    polar(center, inner, wedge.start),
                    polar(center, outer, wedge.start),
                ],
                WHITE.stroke_width(2),
            ))
            .map_err(ChartError::drawing)?;
        }

        let percent_style = TextStyle::from((FONT, 13.0).into_font())
            .color(&palette::TEXT)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for (slice, wedge) in plot.slices.iter().zip(&plot.wedges) {
            let mid = wedge.mid();
            body.draw(&Text::new(
                format!("{:.1}%", wedge.fraction * 100.0),
                polar(center, (outer + inner) / 2.0, mid),
                percent_style.clone(),
            ))
            .map_err(ChartError::drawing)?;

            let anchor = if mid.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            let name_style = TextStyle::from((FONT, 14.0).into_font())
                .color(&palette::TEXT)
                .pos(Pos::new(anchor, VPos::Center));
            body.draw(&Text::new(
                slice.entity.clone(),
                polar(center, outer * 1.1, mid),
                name_style,
            ))
            .map_err(ChartError::drawing)?;
        }

        log::debug!("Drew donut chart with {} slices", plot.wedges.len());
        Ok(())
    }
}
