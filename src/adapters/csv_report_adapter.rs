//! CSV report adapter.
//!
//! Steps are written in long format, one line per (step, ticker), so every
//! step's full weight vector and exposure can be reloaded for inspection.

use crate::domain::driver::RunReport;
use crate::domain::error::RiskAllocError;
use crate::domain::holdings::Holdings;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

fn csv_error(path: &str, e: csv::Error) -> RiskAllocError {
    RiskAllocError::Io(std::io::Error::other(format!(
        "failed to write {}: {}",
        path, e
    )))
}

impl ReportPort for CsvReportAdapter {
    fn write_steps(&self, report: &RunReport, output_path: &str) -> Result<(), RiskAllocError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| csv_error(output_path, e))?;
        wtr.write_record(["step", "date", "ticker", "weight", "exposure"])
            .map_err(|e| csv_error(output_path, e))?;

        for step in &report.steps {
            let step_no = step.step.to_string();
            let date = step.date.format("%Y-%m-%d").to_string();
            let exposure = step.exposure.to_string();
            for (ticker, weight) in step.portfolio.iter() {
                wtr.write_record([
                    step_no.as_str(),
                    date.as_str(),
                    ticker,
                    weight.to_string().as_str(),
                    exposure.as_str(),
                ])
                .map_err(|e| csv_error(output_path, e))?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_holdings(
        &self,
        holdings: &Holdings,
        output_path: &str,
    ) -> Result<(), RiskAllocError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| csv_error(output_path, e))?;
        wtr.write_record(["ticker", "shares", "price", "value"])
            .map_err(|e| csv_error(output_path, e))?;
        for h in &holdings.positions {
            wtr.write_record([
                h.ticker.clone(),
                h.shares.to_string(),
                format!("{:.2}", h.price),
                format!("{:.2}", h.shares as f64 * h.price),
            ])
            .map_err(|e| csv_error(output_path, e))?;
        }
        wtr.write_record([
            "CASH".to_string(),
            String::new(),
            String::new(),
            format!("{:.2}", holdings.leftover),
        ])
        .map_err(|e| csv_error(output_path, e))?;
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::driver::StepResult;
    use crate::domain::holdings::Holding;
    use crate::domain::portfolio::Portfolio;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn sample_report() -> RunReport {
        RunReport {
            steps: vec![
                StepResult {
                    step: 1,
                    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    portfolio: Portfolio::from_weights([("BHP", 0.75), ("CBA", 0.25)]),
                    exposure: 1.05,
                    evictions: vec![],
                },
                StepResult {
                    step: 2,
                    date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
                    portfolio: Portfolio::from_weights([("BHP", 1.0)]),
                    exposure: 1.0,
                    evictions: vec![],
                },
            ],
        }
    }

    #[test]
    fn write_steps_one_line_per_holding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("steps.csv");
        let path_str = path.to_str().unwrap();

        CsvReportAdapter
            .write_steps(&sample_report(), path_str)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "step,date,ticker,weight,exposure");
        assert_eq!(lines[1], "1,2024-01-15,BHP,0.75,1.05");
        assert_eq!(lines[3], "2,2024-01-16,BHP,1,1");
    }

    #[test]
    fn write_holdings_appends_cash_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holdings.csv");
        let holdings = Holdings {
            positions: vec![Holding {
                ticker: "BHP".into(),
                shares: 133,
                price: 45.0,
            }],
            leftover: 15.0,
        };

        CsvReportAdapter
            .write_holdings(&holdings, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "BHP,133,45.00,5985.00");
        assert_eq!(lines[2], "CASH,,,15.00");
    }

    #[test]
    fn unwritable_path_fails() {
        let err = CsvReportAdapter
            .write_steps(&sample_report(), "/nonexistent/dir/steps.csv")
            .unwrap_err();
        assert!(matches!(err, RiskAllocError::Io(_)));
    }
}
