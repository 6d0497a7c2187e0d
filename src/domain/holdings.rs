//! Conversion of target weights into whole-share holdings.

use super::error::RiskAllocError;
use super::portfolio::Portfolio;
use super::table::SignalRow;

pub const DEFAULT_CAPITAL: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub ticker: String,
    pub shares: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Holdings {
    pub positions: Vec<Holding>,
    /// Capital that did not buy a whole share.
    pub leftover: f64,
}

impl Holdings {
    pub fn invested(&self) -> f64 {
        self.positions
            .iter()
            .map(|h| h.shares as f64 * h.price)
            .sum()
    }

    pub fn shares(&self, ticker: &str) -> Option<i64> {
        self.positions
            .iter()
            .find(|h| h.ticker == ticker)
            .map(|h| h.shares)
    }
}

/// Buy `floor(capital * weight / price)` shares of each holding at the
/// prices in `last_prices`; the remainder of each allocation is leftover
/// cash.
pub fn allocate_shares(
    portfolio: &Portfolio,
    last_prices: &SignalRow,
    capital: f64,
) -> Result<Holdings, RiskAllocError> {
    let mut positions = Vec::with_capacity(portfolio.len());
    let mut leftover = 0.0;

    for (ticker, weight) in portfolio.iter() {
        let price = last_prices
            .score(ticker)
            .ok_or_else(|| RiskAllocError::MissingPrice {
                ticker: ticker.to_string(),
            })?;
        if !(price.is_finite() && price > 0.0) {
            return Err(RiskAllocError::data_load(format!(
                "invalid price {price} for {ticker}"
            )));
        }

        let raw_allocation = capital * weight;
        positions.push(Holding {
            ticker: ticker.to_string(),
            shares: (raw_allocation / price).floor() as i64,
            price,
        });
        leftover += raw_allocation % price;
    }

    Ok(Holdings {
        positions,
        leftover,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn prices(entries: &[(&str, f64)]) -> SignalRow {
        SignalRow::new(
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            entries.iter().map(|&(t, p)| (t.to_string(), p)).collect(),
        )
    }

    #[test]
    fn whole_shares_and_leftover() {
        let portfolio = Portfolio::from_weights([("BHP", 0.6), ("CBA", 0.4)]);
        let last = prices(&[("BHP", 45.0), ("CBA", 120.0)]);
        let holdings = allocate_shares(&portfolio, &last, 10_000.0).unwrap();

        // BHP: 6000 / 45 = 133.33 → 133 shares, 15 left.
        // CBA: 4000 / 120 = 33.33 → 33 shares, 40 left.
        assert_eq!(holdings.shares("BHP"), Some(133));
        assert_eq!(holdings.shares("CBA"), Some(33));
        assert_relative_eq!(holdings.leftover, 55.0, epsilon = 1e-9);
        assert_relative_eq!(holdings.invested() + holdings.leftover, 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_price_fails() {
        let portfolio = Portfolio::from_weights([("BHP", 1.0)]);
        let err = allocate_shares(&portfolio, &prices(&[("CBA", 1.0)]), 1000.0).unwrap_err();
        assert!(matches!(err, RiskAllocError::MissingPrice { ticker } if ticker == "BHP"));
    }

    #[test]
    fn non_positive_price_fails() {
        let portfolio = Portfolio::from_weights([("BHP", 1.0)]);
        let err = allocate_shares(&portfolio, &prices(&[("BHP", 0.0)]), 1000.0).unwrap_err();
        assert!(matches!(err, RiskAllocError::DataLoad { .. }));
    }

    #[test]
    fn empty_portfolio_keeps_nothing() {
        let holdings = allocate_shares(&Portfolio::new(), &prices(&[]), 1000.0).unwrap();
        assert!(holdings.positions.is_empty());
        assert_relative_eq!(holdings.leftover, 0.0);
    }
}
