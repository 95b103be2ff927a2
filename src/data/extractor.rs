//! Series Extractor Module
//! Filters rows by indicator and year and reshapes entity columns into series.

use super::model::{
    Dataset, EntitySchema, Row, RowMerge, Series, YearSelector, INDICATOR_COLUMN, YEAR_COLUMN,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Column '{0}' is not present in the dataset")]
    MissingColumn(String),
    #[error("Row {row}, column '{column}': cannot convert '{value}' to {expected}")]
    ValueConversion {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },
    #[error("No rows for indicator '{indicator}' in years {years:?}")]
    EmptySelection { indicator: String, years: Vec<i32> },
}

/// One entity's value at a single year.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub entity: String,
    pub value: f64,
}

/// Per-entity values for each selected year; `None` where no row matched.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTotals {
    pub years: Vec<i32>,
    pub entities: Vec<String>,
    /// `cells[entity][year]`, indices follow `entities` and `years`.
    pub cells: Vec<Vec<Option<f64>>>,
}

/// Series aligned on a shared, ascending year axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub years: Vec<i32>,
    pub layers: Vec<Series>,
}

/// Shared row filtering and reshaping for every chart type.
pub struct SeriesExtractor;

impl SeriesExtractor {
    /// Per-entity series for rows matching `indicator` and `years`, in row order.
    ///
    /// No matching row yields empty series rather than an error.
    pub fn extract(
        dataset: &Dataset,
        indicator: &str,
        years: &YearSelector,
        entities: &[String],
    ) -> Result<Vec<Series>, ExtractError> {
        Self::require_columns(dataset, entities)?;

        let mut series: Vec<Series> = entities.iter().map(Series::new).collect();
        for (row, year) in Self::matching_rows(dataset, indicator, years)? {
            for s in series.iter_mut() {
                let value = Self::value(&row, &s.entity)?;
                s.points.push((year, value));
            }
        }

        log::debug!(
            "Extracted {} series for '{}' ({} points each)",
            series.len(),
            indicator,
            series.first().map(|s| s.points.len()).unwrap_or(0)
        );
        Ok(series)
    }

    /// One merged value per entity at `year`, entities in schema order.
    ///
    /// Zero matching rows yields an empty list.
    pub fn snapshot(
        dataset: &Dataset,
        indicator: &str,
        year: i32,
        schema: &EntitySchema,
        merge: RowMerge,
    ) -> Result<Vec<Snapshot>, ExtractError> {
        let entities = schema.resolve(dataset);
        let series = Self::extract(
            dataset,
            indicator,
            &YearSelector::Set(vec![year]),
            &entities,
        )?;

        Ok(series
            .into_iter()
            .filter_map(|s| {
                merge.merge(&s.values()).map(|value| Snapshot {
                    entity: s.entity,
                    value,
                })
            })
            .collect())
    }

    /// Merged value per entity and selected year, years kept in the given order.
    pub fn grouped_totals(
        dataset: &Dataset,
        indicator: &str,
        years: &[i32],
        entities: &[String],
        merge: RowMerge,
    ) -> Result<GroupedTotals, ExtractError> {
        let series = Self::extract(
            dataset,
            indicator,
            &YearSelector::Set(years.to_vec()),
            entities,
        )?;

        if series.iter().all(Series::is_empty) {
            return Err(ExtractError::EmptySelection {
                indicator: indicator.to_string(),
                years: years.to_vec(),
            });
        }

        let cells = series
            .iter()
            .map(|s| {
                years
                    .iter()
                    .map(|&year| {
                        let values: Vec<f64> = s
                            .points
                            .iter()
                            .filter(|&&(y, _)| y == year)
                            .map(|&(_, v)| v)
                            .collect();
                        merge.merge(&values)
                    })
                    .collect()
            })
            .collect();

        Ok(GroupedTotals {
            years: years.to_vec(),
            entities: entities.to_vec(),
            cells,
        })
    }

    /// Series for the requested entities that exist as columns, aligned on the
    /// sorted union of matching years. A year missing for an entity counts as 0.
    pub fn aligned(
        dataset: &Dataset,
        indicator: &str,
        years: &YearSelector,
        entities: &[String],
        merge: RowMerge,
    ) -> Result<AlignedSeries, ExtractError> {
        let present: Vec<String> = entities
            .iter()
            .filter(|e| {
                let found = dataset.has_column(e);
                if !found {
                    log::warn!("Skipping '{}': not a column of the dataset", e);
                }
                found
            })
            .cloned()
            .collect();

        let series = Self::extract(dataset, indicator, years, &present)?;

        let axis: Vec<i32> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(y, _)| y))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let layers = series
            .into_iter()
            .map(|s| {
                let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
                for &(year, value) in &s.points {
                    by_year.entry(year).or_default().push(value);
                }
                let points = axis
                    .iter()
                    .map(|year| {
                        let value = by_year
                            .get(year)
                            .and_then(|values| merge.merge(values))
                            .unwrap_or(0.0);
                        (*year, value)
                    })
                    .collect();
                Series {
                    entity: s.entity,
                    points,
                }
            })
            .collect();

        Ok(AlignedSeries {
            years: axis,
            layers,
        })
    }

    fn require_columns(dataset: &Dataset, entities: &[String]) -> Result<(), ExtractError> {
        for column in [INDICATOR_COLUMN, YEAR_COLUMN]
            .into_iter()
            .chain(entities.iter().map(String::as_str))
        {
            if !dataset.has_column(column) {
                return Err(ExtractError::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }

    /// Rows of `indicator` whose year passes the selector, with the parsed year.
    fn matching_rows<'a>(
        dataset: &'a Dataset,
        indicator: &str,
        years: &YearSelector,
    ) -> Result<Vec<(Row<'a>, i32)>, ExtractError> {
        let mut matched = Vec::new();
        for row in dataset.rows() {
            if row.get(INDICATOR_COLUMN) != Some(indicator) {
                continue;
            }
            let year = Self::year(&row)?;
            if years.matches(year) {
                matched.push((row, year));
            }
        }
        Ok(matched)
    }

    fn year(row: &Row<'_>) -> Result<i32, ExtractError> {
        let raw = row
            .get(YEAR_COLUMN)
            .ok_or_else(|| ExtractError::MissingColumn(YEAR_COLUMN.to_string()))?;
        raw.trim()
            .parse::<i32>()
            .map_err(|_| ExtractError::ValueConversion {
                row: row.index(),
                column: YEAR_COLUMN.to_string(),
                value: raw.to_string(),
                expected: "integer",
            })
    }

    fn value(row: &Row<'_>, column: &str) -> Result<f64, ExtractError> {
        let raw = row
            .get(column)
            .ok_or_else(|| ExtractError::MissingColumn(column.to_string()))?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| ExtractError::ValueConversion {
                row: row.index(),
                column: column.to_string(),
                value: raw.to_string(),
                expected: "float",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[&[&str]]) -> Dataset {
        let columns = ["Indicator Name", "Year", "A", "B"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        Dataset::from_records(columns, rows).unwrap()
    }

    fn decade() -> Dataset {
        let rows: Vec<Vec<String>> = (2000..=2010)
            .map(|y| {
                vec![
                    "X".to_string(),
                    y.to_string(),
                    format!("{}", y - 2000),
                    format!("{}.5", y - 2000),
                ]
            })
            .collect();
        let columns = ["Indicator Name", "Year", "A", "B"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Dataset::from_records(columns, rows).unwrap()
    }

    fn entities(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn range_selects_inclusive_years() {
        let series = SeriesExtractor::extract(
            &decade(),
            "X",
            &YearSelector::Range {
                start: 2000,
                end: 2005,
            },
            &entities(&["A", "B"]),
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        for s in &series {
            assert_eq!(s.points.len(), 6);
            assert_eq!(s.years(), vec![2000, 2001, 2002, 2003, 2004, 2005]);
        }
        assert_eq!(series[1].points[2], (2002, 2.5));
    }

    #[test]
    fn unknown_indicator_gives_empty_series() {
        let series = SeriesExtractor::extract(
            &decade(),
            "Not there",
            &YearSelector::Range {
                start: 2000,
                end: 2010,
            },
            &entities(&["A", "B"]),
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.iter().all(Series::is_empty));
    }

    #[test]
    fn indicator_match_is_case_sensitive() {
        let series = SeriesExtractor::extract(
            &decade(),
            "x",
            &YearSelector::Set(vec![2000]),
            &entities(&["A"]),
        )
        .unwrap();
        assert!(series[0].is_empty());
    }

    #[test]
    fn rows_keep_encounter_order() {
        let ds = dataset(&[
            &["X", "2003", "3", "30"],
            &["X", "2001", "1", "10"],
            &["Y", "2002", "9", "90"],
            &["X", "2002", "2", "20"],
        ]);
        let series = SeriesExtractor::extract(
            &ds,
            "X",
            &YearSelector::Range {
                start: 2000,
                end: 2010,
            },
            &entities(&["A"]),
        )
        .unwrap();
        assert_eq!(series[0].points, vec![(2003, 3.0), (2001, 1.0), (2002, 2.0)]);
    }

    #[test]
    fn missing_entity_column_fails() {
        let err = SeriesExtractor::extract(
            &decade(),
            "X",
            &YearSelector::Set(vec![2000]),
            &entities(&["A", "Atlantis"]),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::MissingColumn(c) if c == "Atlantis"));
    }

    #[test]
    fn non_numeric_value_fails_with_location() {
        let ds = dataset(&[&["X", "2000", "1", "n/a"]]);
        let err = SeriesExtractor::extract(
            &ds,
            "X",
            &YearSelector::Set(vec![2000]),
            &entities(&["A", "B"]),
        )
        .unwrap_err();
        match err {
            ExtractError::ValueConversion {
                row, column, value, ..
            } => {
                assert_eq!(row, 0);
                assert_eq!(column, "B");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_integer_year_fails() {
        let ds = dataset(&[&["X", "20x0", "1", "2"]]);
        let err = SeriesExtractor::extract(
            &ds,
            "X",
            &YearSelector::Set(vec![2000]),
            &entities(&["A"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ValueConversion {
                expected: "integer",
                ..
            }
        ));
    }

    #[test]
    fn snapshot_last_row_wins_by_default() {
        let ds = dataset(&[
            &["X", "2005", "1", "2"],
            &["X", "2005", "7", "8"],
            &["X", "2006", "100", "100"],
        ]);
        let slices =
            SeriesExtractor::snapshot(&ds, "X", 2005, &EntitySchema::Discover, RowMerge::Last)
                .unwrap();
        assert_eq!(
            slices,
            vec![
                Snapshot {
                    entity: "A".into(),
                    value: 7.0
                },
                Snapshot {
                    entity: "B".into(),
                    value: 8.0
                },
            ]
        );
    }

    #[test]
    fn snapshot_without_rows_is_empty() {
        let slices = SeriesExtractor::snapshot(
            &decade(),
            "X",
            1999,
            &EntitySchema::Discover,
            RowMerge::Last,
        )
        .unwrap();
        assert!(slices.is_empty());
    }

    #[test]
    fn declared_schema_limits_snapshot_entities() {
        let slices = SeriesExtractor::snapshot(
            &decade(),
            "X",
            2004,
            &EntitySchema::Declared(entities(&["B"])),
            RowMerge::Last,
        )
        .unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].value, 4.5);
    }

    #[test]
    fn grouped_totals_sum_duplicate_rows() {
        let ds = dataset(&[
            &["X", "2002", "1", "2"],
            &["X", "2002", "3", "4"],
            &["X", "2004", "5", "6"],
        ]);
        let totals = SeriesExtractor::grouped_totals(
            &ds,
            "X",
            &[2004, 2002, 2006],
            &entities(&["A", "B"]),
            RowMerge::Sum,
        )
        .unwrap();

        assert_eq!(totals.years, vec![2004, 2002, 2006]);
        assert_eq!(totals.cells[0], vec![Some(5.0), Some(4.0), None]);
        assert_eq!(totals.cells[1], vec![Some(6.0), Some(6.0), None]);
    }

    #[test]
    fn grouped_totals_without_matches_fail() {
        let err = SeriesExtractor::grouped_totals(
            &decade(),
            "X",
            &[1990, 1991],
            &entities(&["A"]),
            RowMerge::Sum,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::EmptySelection { .. }));
    }

    #[test]
    fn aligned_axis_is_sorted_union() {
        let ds = dataset(&[
            &["X", "2004", "4", "40"],
            &["X", "2001", "1", "10"],
            &["X", "2003", "3", "30"],
            &["X", "2001", "1", "10"],
        ]);
        let aligned = SeriesExtractor::aligned(
            &ds,
            "X",
            &YearSelector::Range {
                start: 2000,
                end: 2010,
            },
            &entities(&["B", "Ghost", "A"]),
            RowMerge::Sum,
        )
        .unwrap();

        assert_eq!(aligned.years, vec![2001, 2003, 2004]);
        assert_eq!(aligned.layers.len(), 2);
        assert_eq!(aligned.layers[0].entity, "B");
        assert_eq!(aligned.layers[0].values(), vec![20.0, 30.0, 40.0]);
        assert_eq!(aligned.layers[1].values(), vec![2.0, 3.0, 4.0]);
    }
}
