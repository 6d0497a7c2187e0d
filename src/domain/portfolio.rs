//! Portfolio weights.
//!
//! A portfolio maps tickers to fractions of capital. Entries keep insertion
//! order: updating an existing ticker leaves it in place, a new ticker is
//! appended. The eviction ranking breaks weight ties by this order.

use std::fmt;

use super::ranking::{SortBy, sort_entries};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    holdings: Vec<(String, f64)>,
}

impl Portfolio {
    pub fn new() -> Self {
        Portfolio {
            holdings: Vec::new(),
        }
    }

    pub fn from_weights<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut portfolio = Portfolio::new();
        for (ticker, weight) in weights {
            portfolio.set_weight(ticker, weight);
        }
        portfolio
    }

    pub fn weight(&self, ticker: &str) -> Option<f64> {
        self.holdings
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|&(_, w)| w)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.holdings.iter().any(|(t, _)| t == ticker)
    }

    pub fn set_weight(&mut self, ticker: impl Into<String>, weight: f64) {
        let ticker = ticker.into();
        match self.holdings.iter_mut().find(|(t, _)| *t == ticker) {
            Some(entry) => entry.1 = weight,
            None => self.holdings.push((ticker, weight)),
        }
    }

    pub fn remove(&mut self, ticker: &str) -> Option<f64> {
        let idx = self.holdings.iter().position(|(t, _)| t == ticker)?;
        Some(self.holdings.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Sum of all weights.
    pub fn exposure(&self) -> f64 {
        self.holdings.iter().map(|(_, w)| w).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.holdings.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.holdings.iter().map(|(t, _)| t.as_str()).collect()
    }

    /// Scale every weight by `target / exposure`.
    pub fn scale_to(&mut self, target: f64, exposure: f64) {
        for (_, weight) in &mut self.holdings {
            *weight = target * *weight / exposure;
        }
    }

    /// Entries ranked by weight, highest first. Ties keep insertion order.
    pub fn ranked_by_weight(&self) -> Vec<(String, f64)> {
        sort_entries(self.holdings.iter().cloned(), SortBy::Value, true)
    }

    pub fn sorted_by_weight(&self) -> Portfolio {
        Portfolio {
            holdings: self.ranked_by_weight(),
        }
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (ticker, weight)) in self.holdings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ticker}: {weight:.4}")?;
        }
        write!(f, "}}")
    }
}
