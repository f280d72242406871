//! Combined decision surface over the message and spend ledgers.

use std::time::Instant;

use rust_decimal::Decimal;

use super::ledger::{QuotaLedger, TrackingPolicy};
use super::spend::SpendRate;
use crate::config::GovernorConfig;
use crate::types::{ChatId, QuotaKind};

/// Result of recording one answered request.
///
/// The `*_just_exceeded` flags are edge-triggered: they fire on the single
/// call that moves a dimension from within-limit to over-limit and stay
/// false on every subsequent over-limit call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageRecord {
    /// Monetary cost charged for this request.
    pub cost: Decimal,
    pub message_just_exceeded: bool,
    pub spend_just_exceeded: bool,
}

impl UsageRecord {
    pub fn any_just_exceeded(&self) -> bool {
        self.message_just_exceeded || self.spend_just_exceeded
    }

    /// Dimensions newly over limit, in notification order (spend first,
    /// matching the upstream dispatcher's precedence).
    pub fn exceeded_kinds(&self) -> impl Iterator<Item = QuotaKind> {
        let spend = self.spend_just_exceeded.then_some(QuotaKind::Spend);
        let messages = self.message_just_exceeded.then_some(QuotaKind::Messages);
        spend.into_iter().chain(messages)
    }
}

/// Single decision point the request path consults for both quota
/// dimensions of one chat keyspace.
///
/// Construct one instance at startup and hand it to every caller; all
/// tenant state lives inside the two owned ledgers.
#[derive(Debug)]
pub struct QuotaGovernor {
    messages: QuotaLedger<u64>,
    spend: QuotaLedger<Decimal>,
    rate: SpendRate,
}

impl Default for QuotaGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default())
    }
}

impl QuotaGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            messages: QuotaLedger::new(TrackingPolicy::WhenLimited, config.window),
            spend: QuotaLedger::new(TrackingPolicy::Always, config.window),
            rate: config.rate,
        }
    }

    /// Message-count ledger, for limit configuration and capacity reads.
    pub fn messages(&self) -> &QuotaLedger<u64> {
        &self.messages
    }

    /// Spend ledger, for limit configuration and capacity reads.
    pub fn spend(&self) -> &QuotaLedger<Decimal> {
        &self.spend
    }

    pub fn rate(&self) -> SpendRate {
        self.rate
    }

    /// Whether the chat may perform another metered action. Chats without
    /// limits always pass. Pure read, no window reset.
    pub fn may_proceed(&self, chat: ChatId) -> bool {
        self.spend.is_within_limit(chat) && self.messages.is_within_limit(chat)
    }

    pub fn record_usage(&self, chat: ChatId, usage_units: u64) -> UsageRecord {
        self.record_usage_at(chat, usage_units, Instant::now())
    }

    /// Charges one message and the cost of `usage_units` against the chat,
    /// reporting which dimensions crossed their limit on exactly this call.
    pub fn record_usage_at(&self, chat: ChatId, usage_units: u64, now: Instant) -> UsageRecord {
        let message_was_ok = self.messages.is_within_limit(chat);
        let spend_was_ok = self.spend.is_within_limit(chat);

        self.messages.consume_at(chat, 1, now);
        let cost = self.rate.to_cost(usage_units);
        self.spend.consume_at(chat, cost, now);

        let record = UsageRecord {
            cost,
            message_just_exceeded: message_was_ok && !self.messages.is_within_limit(chat),
            spend_just_exceeded: spend_was_ok && !self.spend.is_within_limit(chat),
        };
        for kind in record.exceeded_kinds() {
            tracing::info!(%chat, %kind, %cost, "quota limit crossed");
        }
        record
    }
}
