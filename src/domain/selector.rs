//! Top-K candidate selection from one signal row.

use super::candidate::{Candidate, CandidateSet};
use super::ranking::{SortBy, sort_entries};
use super::table::SignalRow;

/// Select the `max_positions` highest-scoring tickers of `row`.
///
/// The result is ordered ascending by score, so the strongest signal is
/// applied last. Equal scores keep row order, and at the cut-off the later
/// of two equal scores wins. Null (non-finite) scores are never selected.
/// Negative and zero scores are kept; the rebalancer decides whether the
/// resulting set can be sized.
pub fn select_candidates(row: &SignalRow, max_positions: usize) -> CandidateSet {
    let eligible = row
        .scores
        .iter()
        .filter(|(_, score)| score.is_finite())
        .cloned();
    let ascending = sort_entries(eligible, SortBy::Value, false);
    let skip = ascending.len().saturating_sub(max_positions);
    CandidateSet::from_ordered(
        ascending
            .into_iter()
            .skip(skip)
            .map(|(ticker, score)| Candidate::long(ticker, score))
            .collect(),
    )
}
