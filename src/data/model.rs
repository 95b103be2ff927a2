//! Dataset Model Module
//! Row records, series and the selectors that pick a subset of rows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Column holding the indicator name of each row.
pub const INDICATOR_COLUMN: &str = "Indicator Name";
/// Column holding the integer year of each row.
pub const YEAR_COLUMN: &str = "Year";

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// One row of the table: raw string cells addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    cells: &'a [String],
    lookup: &'a HashMap<String, usize>,
}

impl<'a> Row<'a> {
    /// Position of the row in source order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw value of a column, `None` if the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.lookup
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map(String::as_str)
    }
}

/// Ordered, read-only table of string cells with a fixed header.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    lookup: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from a header and rows of equal width.
    pub fn from_records(
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, DatasetError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(DatasetError::RaggedRow {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }

        let lookup = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            columns,
            lookup,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.lookup.contains_key(column)
    }

    /// Every column that is neither the year nor the indicator column, in header order.
    pub fn entity_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != YEAR_COLUMN && c.as_str() != INDICATOR_COLUMN)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in source order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(|(index, cells)| Row {
            index,
            cells,
            lookup: &self.lookup,
        })
    }
}

/// Ordered (year, value) pairs for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub entity: String,
    pub points: Vec<(i32, f64)>,
}

impl Series {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            points: Vec::new(),
        }
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|&(y, _)| y).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Which years a chart request keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSelector {
    /// Inclusive range.
    Range { start: i32, end: i32 },
    /// Explicit set; the order is kept for grouping.
    Set(Vec<i32>),
}

impl YearSelector {
    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearSelector::Range { start, end } => *start <= year && year <= *end,
            YearSelector::Set(years) => years.contains(&year),
        }
    }
}

impl fmt::Display for YearSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelector::Range { start, end } => write!(f, "{} to {}", start, end),
            YearSelector::Set(years) => {
                let listed: Vec<String> = years.iter().map(|y| y.to_string()).collect();
                write!(f, "{}", listed.join(", "))
            }
        }
    }
}

/// How several values for the same entity and year collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMerge {
    First,
    #[default]
    Last,
    Sum,
    Mean,
}

impl RowMerge {
    /// Merge values in encounter order. Empty input yields `None`.
    pub fn merge(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            RowMerge::First => values.first().copied(),
            RowMerge::Last => values.last().copied(),
            RowMerge::Sum => Some(values.iter().sum()),
            RowMerge::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }
}

/// Where the entity columns of a chart come from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySchema {
    /// All columns except `Year` and `Indicator Name`.
    #[default]
    Discover,
    /// An explicit list; each must exist in the dataset.
    Declared(Vec<String>),
}

impl EntitySchema {
    pub fn resolve(&self, dataset: &Dataset) -> Vec<String> {
        match self {
            EntitySchema::Discover => dataset.entity_columns(),
            EntitySchema::Declared(entities) => entities.clone(),
        }
    }
}

/// Indicator, years and entities that feed one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub indicator: String,
    pub years: YearSelector,
    #[serde(default)]
    pub entities: Vec<String>,
}

impl ChartRequest {
    /// Request over an inclusive year range.
    pub fn range(indicator: &str, start: i32, end: i32, entities: &[String]) -> Self {
        Self {
            indicator: indicator.to_string(),
            years: YearSelector::Range { start, end },
            entities: entities.to_vec(),
        }
    }
}
