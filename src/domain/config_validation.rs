//! Configuration validation and typed config building.
//!
//! Everything here runs before any computation, so a bad value is reported
//! without touching the price data.

use crate::domain::error::RiskAllocError;
use crate::domain::holdings::DEFAULT_CAPITAL;
use crate::domain::rebalance::{PARAMS_SECTION, RebalanceParameters};
use crate::domain::transform::{
    DEFAULT_FAST_WINDOW, DEFAULT_SLOW_WINDOW, SIGNAL_SECTION, validate_windows,
};
use crate::ports::config_port::ConfigPort;

pub const HOLDINGS_SECTION: &str = "holdings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalWindows {
    pub fast: usize,
    pub slow: usize,
}

pub fn build_parameters(config: &dyn ConfigPort) -> Result<RebalanceParameters, RiskAllocError> {
    let defaults = RebalanceParameters::default();
    let max_positions = config.get_int(
        PARAMS_SECTION,
        "max_positions",
        defaults.max_positions as i64,
    )?;
    let max_positions = usize::try_from(max_positions).map_err(|_| {
        RiskAllocError::config_invalid(
            PARAMS_SECTION,
            "max_positions",
            "max_positions must be a positive integer",
        )
    })?;

    Ok(RebalanceParameters {
        max_start: config.get_double(PARAMS_SECTION, "max_start", defaults.max_start)?,
        max_ongoing: config.get_double(PARAMS_SECTION, "max_ongoing", defaults.max_ongoing)?,
        max_positions,
        risk_allocation: config.get_double(
            PARAMS_SECTION,
            "risk_allocation",
            defaults.risk_allocation,
        )?,
        long_short: config.get_bool(PARAMS_SECTION, "long_short", defaults.long_short)?,
    })
}

pub fn build_signal_windows(config: &dyn ConfigPort) -> Result<SignalWindows, RiskAllocError> {
    let fast = window(config, "fast_window", DEFAULT_FAST_WINDOW)?;
    let slow = window(config, "slow_window", DEFAULT_SLOW_WINDOW)?;
    validate_windows(fast, slow)?;
    Ok(SignalWindows { fast, slow })
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, RiskAllocError> {
    let value = config.get_int(SIGNAL_SECTION, key, default as i64)?;
    usize::try_from(value).map_err(|_| {
        RiskAllocError::config_invalid(SIGNAL_SECTION, key, format!("{key} must be positive"))
    })
}

pub fn build_capital(config: &dyn ConfigPort) -> Result<f64, RiskAllocError> {
    let capital = config.get_double(HOLDINGS_SECTION, "capital", DEFAULT_CAPITAL)?;
    validate_capital(capital)?;
    Ok(capital)
}

pub fn validate_capital(capital: f64) -> Result<(), RiskAllocError> {
    if !(capital.is_finite() && capital > 0.0) {
        return Err(RiskAllocError::config_invalid(
            HOLDINGS_SECTION,
            "capital",
            "capital must be positive",
        ));
    }
    Ok(())
}

pub fn validate_allocation_config(config: &dyn ConfigPort) -> Result<(), RiskAllocError> {
    build_parameters(config)?.validate()
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), RiskAllocError> {
    build_signal_windows(config).map(|_| ())
}

pub fn validate_holdings_config(config: &dyn ConfigPort) -> Result<(), RiskAllocError> {
    build_capital(config).map(|_| ())
}
