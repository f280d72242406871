//! Rolling-window quota tracking for chat tenants.
//!
//! Two [`QuotaLedger`] instances run side by side inside the
//! [`QuotaGovernor`]: one counting answered messages, one accumulating
//! monetary spend converted from usage units by a [`SpendRate`].

use std::time::Duration;

mod governor;
mod ledger;
mod spend;

pub use governor::{QuotaGovernor, UsageRecord};
pub use ledger::{Capacity, LedgerUnit, QuotaError, QuotaLedger, QuotaSnapshot, TrackingPolicy};
pub use spend::{DEFAULT_PRICE_PER_UNIT, SpendRate};

/// Accounting period shared by both ledgers. Each chat's window anchors
/// independently to its first recorded activity.
pub const QUOTA_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);
