//! Dashboard Configuration Module
//! Chart requests, captions and narration, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. The defaults reproduce the energy dashboard for 2000-2010.

use crate::charts::{AreaChart, BarChart, DonutChart, LineChart};
use crate::data::{ChartRequest, EntitySchema, RowMerge};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const RENEWABLES: &str =
    "Electricity production from renewable sources, excluding hydroelectric (% of total)";
const HYDRO: &str = "Electricity production from hydroelectric sources (% of total)";
const COAL: &str = "Electricity production from coal sources (% of total)";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {}", path.display(), source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn countries() -> Vec<String> {
    ["United States", "China", "India", "Brazil", "Germany"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSection {
    pub indicator: String,
    pub start_year: i32,
    pub end_year: i32,
    pub entities: Vec<String>,
    pub caption: String,
    pub narration: String,
}

impl Default for LineSection {
    fn default() -> Self {
        Self {
            indicator: RENEWABLES.to_string(),
            start_year: 2000,
            end_year: 2010,
            entities: countries(),
            caption: "Line Plot".to_string(),
            narration: "From 2000 to 2010, the United States, China, India, Brazil, and Germany \
                experienced significant growth in renewable energy production. \
                The U.S. increased from 1.92% to 4.10%, China surged from 0.23% to 1.67%, \
                India rose from 0.52% to 3.48%, Brazil climbed from 2.25% to 6.53%, \
                and Germany soared from 2.40% to 13.38%"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonutSection {
    pub indicator: String,
    pub year: i32,
    pub schema: EntitySchema,
    pub merge: RowMerge,
    pub caption: String,
    pub narration: String,
}

impl Default for DonutSection {
    fn default() -> Self {
        Self {
            indicator: HYDRO.to_string(),
            year: 2005,
            schema: EntitySchema::Discover,
            merge: RowMerge::Last,
            caption: "Donut Chart".to_string(),
            narration: "Electricity production from hydroelectric sources (% of total) in the 2005, \
                Brazil has the highest value (42.3%), and uk has the lowest (0.6%)."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSection {
    pub indicator: String,
    pub years: Vec<i32>,
    pub entities: Vec<String>,
    pub merge: RowMerge,
    pub caption: String,
    pub narration: String,
}

impl Default for BarSection {
    fn default() -> Self {
        Self {
            indicator: HYDRO.to_string(),
            years: vec![2002, 2004, 2006, 2008, 2010],
            entities: countries(),
            merge: RowMerge::Sum,
            caption: "Grouped Bar Plot".to_string(),
            narration: "the years 2002, 2004, 2006, 2008, and 2010. Brazil consistently leads in \
                hydroelectric production, ranging from 78.2% to 83.2%, while the United States \
                shows a slight decrease from 6.6% to 6.0%. China and India maintain relatively \
                stable percentages, with Germany contributing the least at around 3.3%."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaSection {
    pub indicator: String,
    pub start_year: i32,
    pub end_year: i32,
    pub entities: Vec<String>,
    pub merge: RowMerge,
    pub caption: String,
    pub narration: String,
}

impl Default for AreaSection {
    fn default() -> Self {
        Self {
            indicator: COAL.to_string(),
            start_year: 2000,
            end_year: 2010,
            entities: countries(),
            merge: RowMerge::Sum,
            caption: "Stacked Area Plot".to_string(),
            narration: "the evolution of coal's share in electricity production (2000-2010) for \
                the United States (52.9% to 45.8%), China (fluctuating, ending at 80.3%), \
                India (fluctuating, around 67.2%), Brazil (maintaining around 2.2%), \
                and Germany (consistently decreasing to 43.6%)."
                .to_string(),
        }
    }
}

/// Everything the dashboard run needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub display: bool,
    /// Dashboard canvas size in pixels.
    pub size: (u32, u32),
    /// Size of each chart rendered on its own.
    pub chart_size: (u32, u32),
    pub title: String,
    pub byline: Option<String>,
    pub line: LineSection,
    pub donut: DonutSection,
    pub bar: BarSection,
    pub area: AreaSection,
    pub summary: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("filtered_data.csv"),
            output: PathBuf::from("22082165.png"),
            display: true,
            size: (2000, 2000),
            chart_size: (800, 600),
            title: "Decade in Power: Visualizing Trends in Global Energy Production (2000-2010) Dashboard"
                .to_string(),
            byline: Some("Name: Swethadevi Ravipati     StudentId: 22082165".to_string()),
            line: LineSection::default(),
            donut: DonutSection::default(),
            bar: BarSection::default(),
            area: AreaSection::default(),
            summary: "In summary, From 2000 to 2010, the Line Plot illustrates substantial growth \
                in renewable energy production for the United States, China, India, Brazil, \
                and Germany. The Donut Chart emphasizes Brazil's dominance in hydroelectric \
                production (42.3%), while the Grouped Bar Plot highlights Brazil consistently \
                leading (78.2% to 83.2%). The Stacked Area Plot shows shifts in coal's share, \
                with the United States decreasing (52.9% to 45.8%) and China fluctuating \
                (ending at 80.3%). These visualizations capture the evolving energy landscape \
                among these nations"
                .to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config; missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn line_chart(&self) -> LineChart {
        let s = &self.line;
        LineChart::new(ChartRequest::range(
            &s.indicator,
            s.start_year,
            s.end_year,
            &s.entities,
        ))
    }

    pub fn donut_chart(&self) -> DonutChart {
        let s = &self.donut;
        DonutChart::new(&s.indicator, s.year, s.schema.clone(), s.merge)
    }

    pub fn bar_chart(&self) -> BarChart {
        let s = &self.bar;
        BarChart::new(&s.indicator, &s.years, &s.entities, s.merge)
    }

    pub fn area_chart(&self) -> AreaChart {
        let s = &self.area;
        AreaChart::new(
            ChartRequest::range(&s.indicator, s.start_year, s.end_year, &s.entities),
            s.merge,
        )
    }
}
