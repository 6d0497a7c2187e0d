#![allow(dead_code)]

use chrono::NaiveDate;
use riskalloc::domain::error::RiskAllocError;
use riskalloc::domain::rebalance::RebalanceParameters;
use riskalloc::domain::table::{SeriesTable, SignalRow};
use riskalloc::ports::data_port::DataPort;

pub struct MockDataPort {
    pub prices: Option<SeriesTable>,
}

impl MockDataPort {
    pub fn new(prices: SeriesTable) -> Self {
        Self {
            prices: Some(prices),
        }
    }

    pub fn failing() -> Self {
        Self { prices: None }
    }
}

impl DataPort for MockDataPort {
    fn load_prices(&self) -> Result<SeriesTable, RiskAllocError> {
        self.prices.clone().ok_or_else(|| RiskAllocError::DataLoad {
            reason: "mock failure".into(),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(i: usize) -> NaiveDate {
    date(2024, 1, 1) + chrono::Duration::days(i as i64)
}

pub fn scenario_params() -> RebalanceParameters {
    RebalanceParameters {
        max_start: 0.05,
        max_ongoing: 0.10,
        max_positions: 3,
        risk_allocation: 1.0,
        long_short: false,
    }
}

pub fn signal_row(i: usize, scores: &[(&str, f64)]) -> SignalRow {
    SignalRow::new(
        day(i),
        scores.iter().map(|&(t, s)| (t.to_string(), s)).collect(),
    )
}

pub fn table(tickers: &[&str], rows: &[Vec<f64>]) -> SeriesTable {
    let mut t = SeriesTable::new(tickers.iter().map(|s| s.to_string()).collect());
    for (i, row) in rows.iter().enumerate() {
        assert!(t.push_row(day(i), row.clone()));
    }
    t
}

/// Deterministic price paths: each ticker accelerates at its own rate with a
/// small oscillation on top. For six tickers and 5/20 windows the four
/// strongest breakout distances of every row are positive, while weaker
/// tickers dip negative and the ranking shifts from row to row.
pub fn generate_prices(tickers: &[&str], count: usize) -> SeriesTable {
    let rows = (0..count)
        .map(|i| {
            let t = i as f64;
            (0..tickers.len())
                .map(|k| {
                    let k = k as f64;
                    let trend = (0.00002 * (k + 1.0) * t * t).exp();
                    let wave = 1.0 + 0.003 * (t / (3.0 + k)).sin();
                    100.0 * trend * wave
                })
                .collect()
        })
        .collect::<Vec<Vec<f64>>>();
    table(tickers, &rows)
}
