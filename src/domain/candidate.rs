//! Candidates proposed for one rebalance step.

use super::ranking::{SortBy, sort_entries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub ticker: String,
    pub score: f64,
    pub direction: Direction,
}

impl Candidate {
    pub fn long(ticker: impl Into<String>, score: f64) -> Self {
        Candidate {
            ticker: ticker.into(),
            score,
            direction: Direction::Long,
        }
    }
}

/// Candidates ordered ascending by score, lowest first.
///
/// The rebalancer applies candidates in this order, and the result depends
/// on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Build a long-only set from (ticker, score) pairs. Pairs are sorted
    /// ascending by score; equal scores keep their input order.
    pub fn from_scores<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let sorted = sort_entries(
            scores.into_iter().map(|(t, s)| (t.into(), s)),
            SortBy::Value,
            false,
        );
        CandidateSet {
            candidates: sorted
                .into_iter()
                .map(|(ticker, score)| Candidate::long(ticker, score))
                .collect(),
        }
    }

    /// Take candidates exactly in the given order.
    pub fn from_ordered(candidates: Vec<Candidate>) -> Self {
        CandidateSet { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.ticker.as_str()).collect()
    }

    /// Sum of raw scores across the set.
    pub fn scaling_base(&self) -> f64 {
        self.candidates.iter().map(|c| c.score).sum()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
