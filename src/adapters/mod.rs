//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;

use crate::domain::error::RiskAllocError;
use crate::ports::data_port::DataPort;
use std::path::Path;

/// Pick a price source by file extension.
pub fn open_price_source(path: &Path) -> Result<Box<dyn DataPort>, RiskAllocError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(Box::new(csv_adapter::CsvAdapter::new(path.to_path_buf()))),
        _ => Err(RiskAllocError::UnsupportedFileType { extension }),
    }
}
