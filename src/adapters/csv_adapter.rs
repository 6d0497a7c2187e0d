//! CSV price file adapter.
//!
//! Layout: a header row whose first column is the date and whose remaining
//! columns are tickers; one row per date. Rows with an empty or unparseable
//! price are dropped.

use crate::domain::error::RiskAllocError;
use crate::domain::table::SeriesTable;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|dt| dt.date())
            })
    }

    fn parse_price(raw: &str) -> f64 {
        raw.trim().parse::<f64>().unwrap_or(f64::NAN)
    }
}

impl DataPort for CsvAdapter {
    fn load_prices(&self) -> Result<SeriesTable, RiskAllocError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(false)
            .from_path(&self.path)
            .map_err(|e| {
                RiskAllocError::data_load(format!("failed to read {}: {}", self.path.display(), e))
            })?;

        let headers = rdr
            .headers()
            .map_err(|e| RiskAllocError::data_load(format!("CSV header error: {}", e)))?
            .clone();
        let tickers: Vec<String> = headers
            .iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();
        if tickers.is_empty() {
            return Err(RiskAllocError::data_load(format!(
                "{} has no ticker columns",
                self.path.display()
            )));
        }

        let mut table = SeriesTable::new(tickers);
        for (line, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| RiskAllocError::data_load(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| RiskAllocError::data_load("missing date column"))?;
            let date = Self::parse_date(date_str).ok_or_else(|| {
                RiskAllocError::data_load(format!(
                    "invalid date \"{}\" on data row {}",
                    date_str,
                    line + 1
                ))
            })?;

            let prices = record.iter().skip(1).map(Self::parse_price).collect();
            table.push_row(date, prices);
        }

        let dropped = table.drop_incomplete_rows();
        if dropped > 0 {
            warn!(dropped, path = %self.path.display(), "dropped price rows with missing values");
        }
        if table.is_empty() {
            return Err(RiskAllocError::InsufficientData {
                rows: 0,
                minimum: 1,
            });
        }
        debug!(
            rows = table.row_count(),
            tickers = table.tickers().len(),
            "loaded price table"
        );
        Ok(table)
    }
}
