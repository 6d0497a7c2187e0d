//! Report generation port trait.

use crate::domain::driver::RunReport;
use crate::domain::error::RiskAllocError;
use crate::domain::holdings::Holdings;

/// Port for writing run results.
pub trait ReportPort {
    fn write_steps(&self, report: &RunReport, output_path: &str) -> Result<(), RiskAllocError>;

    fn write_holdings(&self, holdings: &Holdings, output_path: &str)
    -> Result<(), RiskAllocError>;
}
