//! CSV Data Loader Module
//! Reads a delimited table into a `Dataset` of raw string cells using Polars.

use super::model::{Dataset, DatasetError};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot read {}: {}", path.display(), source)]
    DataAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV {}: {}", path.display(), source)]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Failed to read CSV records {}: {}", path.display(), source)]
    Records {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    RaggedRow(#[from] DatasetError),
}

/// Loads delimited files with a header row.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file. Every cell is kept as text; conversion happens on extraction.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<Dataset, LoaderError> {
        let path = file_path.as_ref();

        File::open(path).map_err(|source| LoaderError::DataAccess {
            path: path.to_path_buf(),
            source,
        })?;

        // Polars pads short records with nulls, so widths are checked first
        Self::check_record_widths(path)?;

        let parse_err = |source: PolarsError| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        };

        // Schema inference off: all columns load as String
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(parse_err)?;

        let (columns, rows) = Self::frame_to_records(&df).map_err(parse_err)?;
        let dataset = Dataset::from_records(columns, rows)?;

        log::info!(
            "Loaded {} rows x {} columns from {}",
            dataset.len(),
            dataset.columns().len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Reject any record whose field count differs from the header.
    fn check_record_widths(path: &Path) -> Result<(), LoaderError> {
        let records_err = |source: csv::Error| LoaderError::Records {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(records_err)?;
        let expected = reader.headers().map_err(records_err)?.len();

        for (row, record) in reader.records().enumerate() {
            let found = record.map_err(records_err)?.len();
            if found != expected {
                return Err(DatasetError::RaggedRow {
                    row,
                    expected,
                    found,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Transpose a string frame into header + row-major cells. Nulls become empty strings.
    fn frame_to_records(df: &DataFrame) -> PolarsResult<(Vec<String>, Vec<Vec<String>>)> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); df.height()];

        for column in df.get_columns() {
            let as_text = column.cast(&DataType::String)?;
            let ca = as_text.str()?;
            for (row, value) in rows.iter_mut().zip(ca.into_iter()) {
                row.push(value.unwrap_or_default().to_string());
            }
        }

        Ok((columns, rows))
    }
}
