//! Data module - CSV loading and series extraction

mod extractor;
mod loader;
mod model;

pub use extractor::{AlignedSeries, ExtractError, GroupedTotals, SeriesExtractor, Snapshot};
pub use loader::{DataLoader, LoaderError};
pub use model::{
    ChartRequest, Dataset, DatasetError, EntitySchema, Row, RowMerge, Series, YearSelector,
    INDICATOR_COLUMN, YEAR_COLUMN,
};
