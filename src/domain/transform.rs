//! Price → return → breakout signal transforms.
//!
//! Each ticker is transformed independently; rows left with any non-finite
//! value are dropped afterwards.

use tracing::warn;

use super::error::RiskAllocError;
use super::table::SeriesTable;

pub const DEFAULT_FAST_WINDOW: usize = 20;
pub const DEFAULT_SLOW_WINDOW: usize = 100;

pub const SIGNAL_SECTION: &str = "signal";

/// ln(p_t / p_{t-1}) per ticker. The first row has no prior price and is
/// dropped.
pub fn log_returns(prices: &SeriesTable) -> SeriesTable {
    let mut returns = SeriesTable::new(prices.tickers().to_vec());
    for i in 1..prices.row_count() {
        let (Some(prev), Some(curr)) = (prices.values(i - 1), prices.values(i)) else {
            continue;
        };
        let row = prev
            .iter()
            .zip(curr)
            .map(|(p0, p1)| (p1 / p0).ln())
            .collect();
        returns.push_row(prices.dates()[i], row);
    }
    let dropped = returns.drop_incomplete_rows();
    if dropped > 0 {
        warn!(dropped, "dropped return rows with non-finite values");
    }
    returns
}

/// Rolling mean over the trailing `window` rows, NaN until the window fills.
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; series.len()];
    if window == 0 || series.len() < window {
        return out;
    }
    let mut sum: f64 = series[..window].iter().sum();
    out[window - 1] = sum / window as f64;
    for i in window..series.len() {
        sum += series[i] - series[i - window];
        out[i] = sum / window as f64;
    }
    out
}

/// Fast rolling mean minus slow rolling mean, per ticker.
///
/// A larger distance means stronger upward momentum. Rows before the slow
/// window fills are dropped.
pub fn breakout(
    returns: &SeriesTable,
    fast: usize,
    slow: usize,
) -> Result<SeriesTable, RiskAllocError> {
    validate_windows(fast, slow)?;

    let columns: Vec<Vec<f64>> = returns
        .tickers()
        .iter()
        .filter_map(|t| returns.column(t))
        .map(|col| {
            let fast_ma = rolling_mean(&col, fast);
            let slow_ma = rolling_mean(&col, slow);
            fast_ma.iter().zip(&slow_ma).map(|(f, s)| f - s).collect()
        })
        .collect();

    let mut signals = SeriesTable::new(returns.tickers().to_vec());
    for (i, &date) in returns.dates().iter().enumerate() {
        signals.push_row(date, columns.iter().map(|c| c[i]).collect());
    }
    signals.drop_incomplete_rows();
    Ok(signals)
}

pub fn validate_windows(fast: usize, slow: usize) -> Result<(), RiskAllocError> {
    if fast < 1 {
        return Err(RiskAllocError::config_invalid(
            SIGNAL_SECTION,
            "fast_window",
            "fast_window must be at least 1",
        ));
    }
    if slow <= fast {
        return Err(RiskAllocError::config_invalid(
            SIGNAL_SECTION,
            "slow_window",
            "slow_window must be greater than fast_window",
        ));
    }
    Ok(())
}
