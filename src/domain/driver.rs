//! Time-series driver: one rebalance per signal row.
//!
//! The portfolio reported for step *t* (normalized, sorted by weight) is the
//! exact portfolio handed to step *t + 1*. Steps run strictly in table order.

use chrono::NaiveDate;
use tracing::{info, info_span};

use super::error::RiskAllocError;
use super::portfolio::Portfolio;
use super::rebalance::{Eviction, RebalanceParameters, rebalance};
use super::selector::select_candidates;
use super::table::{SeriesTable, SignalRow};

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// 1-based position of the row in the signal table.
    pub step: usize,
    pub date: NaiveDate,
    pub portfolio: Portfolio,
    pub exposure: f64,
    pub evictions: Vec<Eviction>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub steps: Vec<StepResult>,
}

impl RunReport {
    pub fn final_step(&self) -> Option<&StepResult> {
        self.steps.last()
    }

    pub fn final_portfolio(&self) -> Option<&Portfolio> {
        self.final_step().map(|s| &s.portfolio)
    }

    pub fn total_evictions(&self) -> usize {
        self.steps.iter().map(|s| s.evictions.len()).sum()
    }
}

/// Rebalance once per row of `signals`, starting from `initial`.
///
/// Parameters are validated before the first step. A failing step stops the
/// run with [`RiskAllocError::StepFailed`], which carries the last completed
/// step.
pub fn run(
    signals: &SeriesTable,
    params: &RebalanceParameters,
    initial: Portfolio,
) -> Result<RunReport, RiskAllocError> {
    run_rows(signals.rows(), params, initial)
}

pub fn run_rows<I>(
    rows: I,
    params: &RebalanceParameters,
    initial: Portfolio,
) -> Result<RunReport, RiskAllocError>
where
    I: IntoIterator<Item = SignalRow>,
{
    params.validate()?;

    let mut report = RunReport::default();
    let mut portfolio = initial;

    for (idx, row) in rows.into_iter().enumerate() {
        let step = idx + 1;
        let _span = info_span!("step", step, date = %row.date).entered();

        let candidates = select_candidates(&row, params.max_positions);
        let outcome = match rebalance(params, portfolio, &candidates) {
            Ok(o) => o,
            Err(e) => {
                return Err(RiskAllocError::StepFailed {
                    step,
                    date: row.date,
                    last_completed: report.steps.pop().map(Box::new),
                    source: Box::new(e),
                });
            }
        };

        info!(
            positions = outcome.portfolio.len(),
            exposure = outcome.exposure,
            evictions = outcome.evictions.len(),
            "portfolio: {}",
            outcome.portfolio
        );

        portfolio = outcome.portfolio.clone();
        report.steps.push(StepResult {
            step,
            date: row.date,
            portfolio: outcome.portfolio,
            exposure: outcome.exposure,
            evictions: outcome.evictions,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn params() -> RebalanceParameters {
        RebalanceParameters {
            max_start: 0.05,
            max_ongoing: 0.10,
            max_positions: 3,
            risk_allocation: 1.0,
            long_short: false,
        }
    }

    fn table(rows: &[&[f64]]) -> SeriesTable {
        let mut t = SeriesTable::new(vec!["A".into(), "B".into(), "C".into(), "D".into()]);
        for (i, row) in rows.iter().enumerate() {
            t.push_row(date(i as u32 + 1), row.to_vec());
        }
        t
    }

    #[test]
    fn threads_reported_portfolio_into_next_step() {
        let signals = table(&[&[3.0, 2.0, 1.0, 0.0], &[3.0, 2.0, 1.0, 5.0]]);
        let report = run(&signals, &params(), Portfolio::new()).unwrap();

        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].step, 1);
        assert_eq!(report.steps[1].date, date(2));
        // Step 2 sees step 1's full book, so retained B runs the capacity
        // check first and loses to C.
        assert_eq!(report.steps[1].evictions.len(), 1);
        assert_eq!(report.steps[1].evictions[0].ticker, "B");
        assert_eq!(
            report.final_portfolio().unwrap().tickers(),
            vec!["C", "A", "D"]
        );
    }

    #[test]
    fn empty_table_gives_empty_report() {
        let report = run(&table(&[]), &params(), Portfolio::new()).unwrap();
        assert!(report.steps.is_empty());
        assert!(report.final_portfolio().is_none());
    }

    #[test]
    fn invalid_params_fail_before_first_step() {
        let p = RebalanceParameters {
            max_positions: 0,
            ..params()
        };
        let err = run(&table(&[&[1.0, 1.0, 1.0, 1.0]]), &p, Portfolio::new()).unwrap_err();
        assert!(matches!(err, RiskAllocError::ConfigInvalid { .. }));
    }

    #[test]
    fn non_positive_row_stops_run_with_last_good_step() {
        let signals = table(&[
            &[3.0, 2.0, 1.0, 0.0],
            &[0.0, -1.0, 0.0, -2.0],
            &[3.0, 2.0, 1.0, 0.0],
        ]);
        let err = run(&signals, &params(), Portfolio::new()).unwrap_err();
        match err {
            RiskAllocError::StepFailed {
                step,
                date: failed_on,
                last_completed,
                source,
            } => {
                assert_eq!(step, 2);
                assert_eq!(failed_on, date(2));
                let last = last_completed.unwrap();
                assert_eq!(last.step, 1);
                assert_relative_eq!(last.portfolio.exposure(), 1.0, epsilon = 1e-12);
                assert!(matches!(*source, RiskAllocError::DegenerateInput { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failure_on_first_step_has_no_last_completed() {
        let signals = table(&[&[-1.0, -1.0, -1.0, -1.0]]);
        let err = run(&signals, &params(), Portfolio::new()).unwrap_err();
        match err {
            RiskAllocError::StepFailed {
                step,
                last_completed,
                source,
                ..
            } => {
                assert_eq!(step, 1);
                assert!(last_completed.is_none());
                assert!(matches!(*source, RiskAllocError::DegenerateInput { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn all_null_row_has_no_candidates() {
        let signals = table(&[&[f64::NAN, f64::NAN, f64::NAN, f64::NAN]]);
        let err = run(&signals, &params(), Portfolio::new()).unwrap_err();
        match err {
            RiskAllocError::StepFailed { source, .. } => {
                assert!(matches!(*source, RiskAllocError::EmptyCandidates));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn seeded_portfolio_is_used_as_first_input() {
        let seed = Portfolio::from_weights([("C", 0.6), ("B", 0.4)]);
        let signals = table(&[&[f64::NAN, 2.0, 1.0, f64::NAN]]);
        let report = run(&signals, &params(), seed).unwrap();
        let first = &report.steps[0];
        // Both candidates were held and the book is below capacity.
        assert_eq!(first.portfolio.tickers(), vec!["C", "B"]);
        assert!(first.evictions.is_empty());
    }

    #[test]
    fn total_evictions_counts_all_steps() {
        let signals = table(&[&[3.0, 2.0, 1.0, 0.0], &[3.0, 2.0, 1.0, 5.0]]);
        let report = run(&signals, &params(), Portfolio::new()).unwrap();
        assert_eq!(report.total_evictions(), 1);
    }
}
