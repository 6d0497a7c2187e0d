//! Incremental, capacity-constrained rebalancing.
//!
//! Candidates are applied one at a time in ascending score order. Each
//! application caps the candidate's weight, enforces the position limit by
//! evicting one entry, and rescales the whole book back to the target
//! exposure. Because every rescale moves every weight, the outcome depends
//! on the candidate order.

use tracing::debug;

use super::candidate::{CandidateSet, Direction};
use super::error::RiskAllocError;
use super::portfolio::Portfolio;

pub const PARAMS_SECTION: &str = "allocation";

/// Sizing parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceParameters {
    /// Cap on a new position's initial weight.
    pub max_start: f64,
    /// Cap on a retained position's weight.
    pub max_ongoing: f64,
    pub max_positions: usize,
    /// Target total exposure after each rescale.
    pub risk_allocation: f64,
    /// Whether short exposure is permitted. Short sizing is not implemented,
    /// so short candidates are rejected either way.
    pub long_short: bool,
}

impl Default for RebalanceParameters {
    fn default() -> Self {
        RebalanceParameters {
            max_start: 0.05,
            max_ongoing: 0.10,
            max_positions: 30,
            risk_allocation: 1.0,
            long_short: false,
        }
    }
}

impl RebalanceParameters {
    pub fn validate(&self) -> Result<(), RiskAllocError> {
        validate_cap("max_start", self.max_start)?;
        validate_cap("max_ongoing", self.max_ongoing)?;
        if self.max_positions < 1 {
            return Err(RiskAllocError::config_invalid(
                PARAMS_SECTION,
                "max_positions",
                "max_positions must be at least 1",
            ));
        }
        if !(self.risk_allocation.is_finite() && self.risk_allocation > 0.0) {
            return Err(RiskAllocError::config_invalid(
                PARAMS_SECTION,
                "risk_allocation",
                "risk_allocation must be positive",
            ));
        }
        Ok(())
    }
}

fn validate_cap(key: &str, value: f64) -> Result<(), RiskAllocError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(RiskAllocError::config_invalid(
            PARAMS_SECTION,
            key,
            format!("{key} must be in (0, 1]"),
        ));
    }
    Ok(())
}

/// Weight given to one candidate before eviction and rescaling.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub ticker: String,
    /// Score divided by the candidate set's scaling base.
    pub scaled_weight: f64,
    /// Scaled weight after the start or ongoing cap.
    pub assigned_weight: f64,
    pub retained: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Eviction {
    pub ticker: String,
    pub weight: f64,
    /// The candidate whose insertion triggered the capacity check.
    pub incoming: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceOutcome {
    /// Sorted by weight, highest first.
    pub portfolio: Portfolio,
    /// Total weight before the final rescale.
    pub exposure: f64,
    pub assignments: Vec<Assignment>,
    pub evictions: Vec<Eviction>,
}

/// Apply `candidates` to `portfolio` in order.
///
/// Capacity check: whenever the book held `max_positions` or more tickers
/// before a candidate was applied, retained candidates included, the
/// entries are ranked by weight (highest first) and the head of the top
/// `max_positions` becomes the eviction target. The target goes if its
/// weight is below the candidate's scaled weight, otherwise the candidate
/// itself goes. This removes the *largest* holding, not the weakest one,
/// and a retained candidate applied to a full book can evict itself; the
/// rule is kept as-is for output compatibility with existing allocations.
///
/// With `max_positions == 1` a retained candidate empties the book, which
/// is reported as [`RiskAllocError::DegenerateInput`].
pub fn rebalance(
    params: &RebalanceParameters,
    mut portfolio: Portfolio,
    candidates: &CandidateSet,
) -> Result<RebalanceOutcome, RiskAllocError> {
    params.validate()?;
    if candidates.is_empty() {
        return Err(RiskAllocError::EmptyCandidates);
    }

    let scaling_base = candidates.scaling_base();
    if !(scaling_base.is_finite() && scaling_base > 0.0) {
        return Err(RiskAllocError::DegenerateInput { scaling_base });
    }
    for candidate in candidates {
        if candidate.direction == Direction::Short {
            return Err(RiskAllocError::InvalidCandidate {
                ticker: candidate.ticker.clone(),
                reason: "short positions are not supported".to_string(),
            });
        }
        if !(candidate.score.is_finite() && candidate.score > 0.0) {
            return Err(RiskAllocError::InvalidCandidate {
                ticker: candidate.ticker.clone(),
                reason: format!("score {} cannot be sized long", candidate.score),
            });
        }
    }

    let retained: Vec<bool> = candidates
        .iter()
        .map(|c| portfolio.contains(&c.ticker))
        .collect();

    let mut assignments = Vec::with_capacity(candidates.len());
    let mut evictions = Vec::new();
    let mut exposure = portfolio.exposure();

    for (candidate, &is_retained) in candidates.iter().zip(&retained) {
        let num_positions = portfolio.len();
        let scaled_weight = candidate.score / scaling_base;
        let cap = if is_retained {
            params.max_ongoing
        } else {
            params.max_start
        };
        let assigned_weight = scaled_weight.min(cap);
        portfolio.set_weight(candidate.ticker.as_str(), assigned_weight);
        debug!(
            ticker = %candidate.ticker,
            scaled_weight,
            assigned_weight,
            retained = is_retained,
            "assigned candidate weight"
        );
        assignments.push(Assignment {
            ticker: candidate.ticker.clone(),
            scaled_weight,
            assigned_weight,
            retained: is_retained,
        });

        if num_positions >= params.max_positions {
            if let Some(eviction) =
                evict(&mut portfolio, &candidate.ticker, scaled_weight, params)
            {
                debug!(
                    evicted = %eviction.ticker,
                    weight = eviction.weight,
                    incoming = %eviction.incoming,
                    "capacity eviction"
                );
                evictions.push(eviction);
            }
        }

        exposure = portfolio.exposure();
        if !(exposure.is_finite() && exposure > 0.0) {
            return Err(RiskAllocError::DegenerateInput {
                scaling_base: exposure,
            });
        }
        portfolio.scale_to(params.risk_allocation, exposure);
    }

    Ok(RebalanceOutcome {
        portfolio: portfolio.sorted_by_weight(),
        exposure,
        assignments,
        evictions,
    })
}

fn evict(
    portfolio: &mut Portfolio,
    incoming: &str,
    scaled_weight: f64,
    params: &RebalanceParameters,
) -> Option<Eviction> {
    let (target, target_weight) = portfolio
        .ranked_by_weight()
        .into_iter()
        .take(params.max_positions)
        .next()?;
    let victim = if target_weight < scaled_weight {
        target
    } else {
        incoming.to_string()
    };
    let weight = portfolio.remove(&victim)?;
    Some(Eviction {
        ticker: victim,
        weight,
        incoming: incoming.to_string(),
    })
}
