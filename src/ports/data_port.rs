//! Price data access port trait.

use crate::domain::error::RiskAllocError;
use crate::domain::table::SeriesTable;

pub trait DataPort {
    /// Load the full price table: one column per ticker, one row per date,
    /// rows with missing values already removed.
    fn load_prices(&self) -> Result<SeriesTable, RiskAllocError>;
}
