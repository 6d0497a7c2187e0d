//! Configuration access port trait.

use crate::domain::error::RiskAllocError;

/// Typed access to sectioned key/value configuration.
///
/// A missing key yields the default. A key that is present but does not
/// parse as the requested type is a [`RiskAllocError::ConfigInvalid`].
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, RiskAllocError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, RiskAllocError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, RiskAllocError>;
}
