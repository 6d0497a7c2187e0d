//! Date-indexed tables of per-ticker values.
//!
//! A [`SeriesTable`] holds prices, returns or signal scores: one column per
//! ticker, one row per date. A [`SignalRow`] is a single row paired with its
//! tickers, in column order.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    values: Vec<Vec<f64>>,
}

/// One time step of signal scores, in table column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub scores: Vec<(String, f64)>,
}

impl SignalRow {
    pub fn new(date: NaiveDate, scores: Vec<(String, f64)>) -> Self {
        Self { date, scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn score(&self, ticker: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|&(_, s)| s)
    }
}

impl SeriesTable {
    pub fn new(tickers: Vec<String>) -> Self {
        Self {
            tickers,
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a row. The row must have one value per ticker.
    pub fn push_row(&mut self, date: NaiveDate, row: Vec<f64>) -> bool {
        if row.len() != self.tickers.len() {
            return false;
        }
        self.dates.push(date);
        self.values.push(row);
        true
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self, index: usize) -> Option<&[f64]> {
        self.values.get(index).map(Vec::as_slice)
    }

    /// Column for one ticker, in date order.
    pub fn column(&self, ticker: &str) -> Option<Vec<f64>> {
        let col = self.tickers.iter().position(|t| t == ticker)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }

    pub fn row(&self, index: usize) -> Option<SignalRow> {
        let values = self.values.get(index)?;
        let scores = self
            .tickers
            .iter()
            .cloned()
            .zip(values.iter().copied())
            .collect();
        Some(SignalRow::new(self.dates[index], scores))
    }

    pub fn last_row(&self) -> Option<SignalRow> {
        self.row_count().checked_sub(1).and_then(|i| self.row(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = SignalRow> + '_ {
        (0..self.row_count()).filter_map(|i| self.row(i))
    }

    /// Drop every row containing a non-finite value. Returns the number of
    /// rows removed.
    pub fn drop_incomplete_rows(&mut self) -> usize {
        let before = self.values.len();
        let mut dates = Vec::with_capacity(before);
        let mut values = Vec::with_capacity(before);
        for (date, row) in self.dates.drain(..).zip(self.values.drain(..)) {
            if row.iter().all(|v| v.is_finite()) {
                dates.push(date);
                values.push(row);
            }
        }
        self.dates = dates;
        self.values = values;
        before - self.values.len()
    }
}
