//! Construction-time settings for the governor.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::quota::{QUOTA_WINDOW, SpendRate};

/// Settings applied when constructing a [`QuotaGovernor`](crate::QuotaGovernor).
///
/// Defaults match the reference deployment: a 24h window and the default
/// per-unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernorConfig {
    /// Accounting period shared by both ledgers.
    pub window: Duration,
    /// Usage-unit to cost conversion for the spend ledger.
    pub rate: SpendRate,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            window: QUOTA_WINDOW,
            rate: SpendRate::default(),
        }
    }
}

impl GovernorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the spend rate overridable from the environment.
    pub fn from_env() -> Self {
        Self {
            rate: SpendRate::from_env(),
            ..Self::default()
        }
    }

    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn price_per_unit(mut self, price: Decimal) -> Self {
        self.rate = SpendRate::new(price);
        self
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = GovernorConfig::default();
        assert_eq!(config.window, Duration::from_secs(86_400));
        assert_eq!(config.rate.price_per_unit(), dec!(0.2));
    }

    #[test]
    fn test_builder_overrides() {
        let config = GovernorConfig::new()
            .window(Duration::from_secs(3600))
            .price_per_unit(dec!(0.05));
        assert_eq!(config.window, Duration::from_secs(3600));
        assert_eq!(config.rate.to_cost(100), dec!(5));
    }
}
