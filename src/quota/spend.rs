//! Conversion of metered usage units into monetary cost.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default price per usage unit in USD.
pub const DEFAULT_PRICE_PER_UNIT: Decimal = dec!(0.2);

const PRICE_ENV_VAR: &str = "CHAT_QUOTA_PRICE_PER_UNIT";

/// Fixed price applied to upstream-reported usage units.
///
/// Stateless by design: the rate and any rounding policy live here so the
/// ledger stays ignorant of money arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendRate {
    price_per_unit: Decimal,
}

impl Default for SpendRate {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_PER_UNIT)
    }
}

impl SpendRate {
    pub const fn new(price_per_unit: Decimal) -> Self {
        Self { price_per_unit }
    }

    /// Rate from `CHAT_QUOTA_PRICE_PER_UNIT`, falling back to the default
    /// when unset or unparsable.
    pub fn from_env() -> Self {
        std::env::var(PRICE_ENV_VAR)
            .ok()
            .and_then(|raw| raw.parse::<Decimal>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn price_per_unit(&self) -> Decimal {
        self.price_per_unit
    }

    pub fn to_cost(&self, usage_units: u64) -> Decimal {
        Decimal::from(usage_units) * self.price_per_unit
    }
}
