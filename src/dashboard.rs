//! Dashboard Composer
//! Lays out the four charts in a 2x2 grid with narration and a summary.
//!
//! Layout (top to bottom):
//! 1. Banner: dashboard title and optional byline
//! 2. Grid: line | donut, bar | area, each with its narration underneath
//! 3. Summary paragraph

use crate::charts::{
    palette, render_on, render_standalone, Canvas, Chart, ChartError, ChartLabels, FONT,
};
use crate::config::DashboardConfig;
use crate::data::Dataset;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::path::{Path, PathBuf};

const BANNER_SHARE: f64 = 0.08;
const SUMMARY_SHARE: f64 = 0.11;
const NARRATION_SHARE: f64 = 0.2;
const NARRATION_FONT: u32 = 16;
const SUMMARY_FONT: u32 = 18;

/// Greedy word wrap to at most `max_chars` per line. Longer words stay whole.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Centered, wrapped paragraph starting near the top of `area`.
fn draw_paragraph<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    font_size: u32,
) -> Result<(), ChartError> {
    let (w, _) = area.dim_in_pixel();
    // Average glyph is roughly half the font size wide
    let max_chars = ((w as f64 * 0.92) / (font_size as f64 * 0.5)).max(10.0) as usize;
    let style = TextStyle::from((FONT, font_size as f64).into_font().style(FontStyle::Bold))
        .color(&palette::TEXT)
        .pos(Pos::new(HPos::Center, VPos::Top));

    let line_height = (font_size as f64 * 1.35) as i32;
    for (i, line) in wrap_text(text, max_chars).into_iter().enumerate() {
        area.draw(&Text::new(
            line,
            (w as i32 / 2, 8 + i as i32 * line_height),
            style.clone(),
        ))
        .map_err(ChartError::drawing)?;
    }
    Ok(())
}

/// One grid cell: chart on white with a short caption, narration below.
fn draw_cell<C: Chart, DB: DrawingBackend>(
    chart: &C,
    dataset: &Dataset,
    cell: &DrawingArea<DB, Shift>,
    caption: &str,
    narration: &str,
) -> Result<C::Plot, ChartError> {
    let cell = cell.margin(12, 4, 24, 24);
    let (_, h) = cell.dim_in_pixel();
    let chart_h = (h as f64 * (1.0 - NARRATION_SHARE)) as i32;
    let (chart_area, text_area) = cell.split_vertically(chart_h);

    chart_area.fill(&WHITE).map_err(ChartError::drawing)?;
    let plot = render_on(chart, dataset, &chart_area, &ChartLabels::caption(caption))?;
    draw_paragraph(&text_area, narration, NARRATION_FONT)?;

    log::info!("Rendered '{}' cell", caption);
    Ok(plot)
}

fn draw_banner<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    byline: Option<&str>,
) -> Result<(), ChartError> {
    let (w, h) = area.dim_in_pixel();
    let center = w as i32 / 2;

    let title_style = TextStyle::from((FONT, 34.0).into_font().style(FontStyle::Bold))
        .color(&palette::TEXT)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        title.to_string(),
        (center, (h as f64 * 0.35) as i32),
        title_style,
    ))
    .map_err(ChartError::drawing)?;

    if let Some(byline) = byline {
        let byline_style = TextStyle::from((FONT, 20.0).into_font().style(FontStyle::Bold))
            .color(&palette::TEXT)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(
            byline.to_string(),
            (center, (h as f64 * 0.78) as i32),
            byline_style,
        ))
        .map_err(ChartError::drawing)?;
    }
    Ok(())
}

/// Compose the full dashboard in memory. Nothing is written to disk.
pub fn compose(dataset: &Dataset, config: &DashboardConfig) -> Result<Canvas, ChartError> {
    let (width, height) = config.size;
    let mut canvas = Canvas::new(width, height);
    {
        let root = canvas.area();
        root.fill(&palette::DASHBOARD_BACKGROUND)
            .map_err(ChartError::drawing)?;

        let banner_h = (height as f64 * BANNER_SHARE) as i32;
        let summary_h = (height as f64 * SUMMARY_SHARE) as i32;
        let (banner, rest) = root.split_vertically(banner_h);
        let (grid, summary) = rest.split_vertically(height as i32 - banner_h - summary_h);

        draw_banner(&banner, &config.title, config.byline.as_deref())?;

        let cells = grid.split_evenly((2, 2));
        draw_cell(
            &config.line_chart(),
            dataset,
            &cells[0],
            &config.line.caption,
            &config.line.narration,
        )?;
        draw_cell(
            &config.donut_chart(),
            dataset,
            &cells[1],
            &config.donut.caption,
            &config.donut.narration,
        )?;
        draw_cell(
            &config.bar_chart(),
            dataset,
            &cells[2],
            &config.bar.caption,
            &config.bar.narration,
        )?;
        draw_cell(
            &config.area_chart(),
            dataset,
            &cells[3],
            &config.area.caption,
            &config.area.narration,
        )?;

        draw_paragraph(&summary.margin(0, 0, 80, 80), &config.summary, SUMMARY_FONT)?;
        root.present().map_err(ChartError::drawing)?;
    }
    Ok(canvas)
}

/// Compose, save to the configured output path, and open it if enabled.
pub fn render_dashboard(dataset: &Dataset, config: &DashboardConfig) -> Result<PathBuf, ChartError> {
    let canvas = compose(dataset, config)?;
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    canvas.save(&config.output)?;

    if config.display {
        show(&config.output);
    }
    Ok(config.output.clone())
}

/// Hand the image to the system viewer. Failure to open is not fatal.
pub fn show(path: &Path) {
    if let Err(e) = open::that(path) {
        log::warn!("Could not open {}: {}", path.display(), e);
    }
}

fn write_standalone<C: Chart>(
    chart: &C,
    dataset: &Dataset,
    size: (u32, u32),
    dir: &Path,
) -> Result<PathBuf, ChartError> {
    let (canvas, _) = render_standalone(chart, dataset, size)?;
    let path = dir.join(format!("{}.png", chart.name()));
    canvas.save(&path)?;
    Ok(path)
}

/// Render each chart on its own canvas into `dir`.
pub fn render_individual_charts(
    dataset: &Dataset,
    config: &DashboardConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(dir)?;
    let size = config.chart_size;
    Ok(vec![
        write_standalone(&config.line_chart(), dataset, size, dir)?,
        write_standalone(&config.donut_chart(), dataset, size, dir)?,
        write_standalone(&config.bar_chart(), dataset, size, dir)?,
        write_standalone(&config.area_chart(), dataset, size, dir)?,
    ])
}
