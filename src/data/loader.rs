//! CSV Data Loader Module
//! Fetches the remote tips CSV and parses it into a Polars DataFrame.

use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;

/// The tips dataset served by the seaborn-data repository.
pub const TIPS_CSV_URL: &str =
    "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/tips.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch CSV: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Session-scoped holder for the loaded dataset. Filled exactly once after the
/// background fetch completes; read-only for the rest of the session.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Fetch a CSV resource over HTTP and parse it.
    ///
    /// Blocking; callers run this on a background thread.
    pub fn fetch_csv(url: &str) -> Result<DataFrame, LoaderError> {
        log::info!("fetching CSV from {url}");
        let body = reqwest::blocking::get(url)?
            .error_for_status()?
            .bytes()?
            .to_vec();

        let df = CsvReadOptions::default()
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(body))
            .finish()?;

        log::info!("loaded {} rows, {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Get the number of rows in the DataFrame.
    pub fn row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Set DataFrame directly (used after the background load completes).
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}
