//! Per-chat rolling-window consumption ledger.

use std::fmt;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::types::ChatId;

/// Errors raised while configuring a ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuotaError {
    /// A limit must be a positive amount; zero and negative values are
    /// rejected, never silently clamped.
    #[error("invalid limit {value}: limit must be positive")]
    InvalidLimit { value: String },
}

/// Numeric unit a ledger counts in.
///
/// Implemented for `u64` (message counts) and [`Decimal`] (spend).
pub trait LedgerUnit:
    Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const ZERO: Self;

    fn add(self, other: Self) -> Self;

    /// `max(self - other, 0)`.
    fn sub_floor_zero(self, other: Self) -> Self;

    fn is_positive(self) -> bool {
        self > Self::ZERO
    }
}

impl LedgerUnit for u64 {
    const ZERO: Self = 0;

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }

    fn sub_floor_zero(self, other: Self) -> Self {
        self.saturating_sub(other)
    }
}

impl LedgerUnit for Decimal {
    const ZERO: Self = Decimal::ZERO;

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn sub_floor_zero(self, other: Self) -> Self {
        let diff = self - other;
        if diff < Decimal::ZERO { Decimal::ZERO } else { diff }
    }
}

/// Whether consumption is recorded for chats that have no limit configured.
///
/// The message ledger skips unlimited chats entirely; the spend ledger
/// accumulates regardless, so spend history exists before a limit is ever
/// set. Downstream remaining-capacity displays depend on this asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPolicy {
    /// Record only when a limit exists for the chat.
    WhenLimited,
    /// Record unconditionally.
    Always,
}

/// Remaining budget for a chat on one quota dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Capacity<U> {
    /// No limit configured; consumption is never denied.
    Unbounded,
    /// `max(limit - consumed, 0)` for the current window.
    Limited(U),
}

impl<U: LedgerUnit> Capacity<U> {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Remaining amount, `None` when unbounded.
    pub fn amount(&self) -> Option<U> {
        match self {
            Self::Unbounded => None,
            Self::Limited(amount) => Some(*amount),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Limited(amount) => !amount.is_positive(),
        }
    }
}

#[derive(Debug)]
struct LedgerEntry<U> {
    limit: Option<U>,
    consumed: U,
    window_start: Option<Instant>,
}

impl<U: LedgerUnit> Default for LedgerEntry<U> {
    fn default() -> Self {
        Self {
            limit: None,
            consumed: U::ZERO,
            window_start: None,
        }
    }
}

/// Point-in-time view of one chat's ledger state.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaSnapshot<U> {
    pub chat: ChatId,
    pub limit: Option<U>,
    pub consumed: U,
    pub within_limit: bool,
}

/// Rolling-window consumption counter keyed by chat.
///
/// The window resets lazily inside [`consume_at`](Self::consume_at): a chat
/// idle past the window length collapses to a single reset on its next
/// consumption, not a replay of every elapsed window. Read accessors report
/// against the stored counter and never roll the window themselves.
///
/// Each entry lives behind the map's per-key lock, so a single consume is
/// atomic with respect to other consumes for the same chat.
#[derive(Debug)]
pub struct QuotaLedger<U: LedgerUnit> {
    entries: DashMap<ChatId, LedgerEntry<U>>,
    policy: TrackingPolicy,
    window: Duration,
}

impl<U: LedgerUnit> QuotaLedger<U> {
    pub fn new(policy: TrackingPolicy, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
            window,
        }
    }

    /// Replaces any existing limit. Consumption and the window anchor are
    /// left untouched, so lowering a limit below current consumption puts
    /// the chat immediately over limit until the window rolls.
    pub fn set_limit(&self, chat: ChatId, limit: U) -> Result<(), QuotaError> {
        if !limit.is_positive() {
            return Err(QuotaError::InvalidLimit {
                value: limit.to_string(),
            });
        }
        self.entries.entry(chat).or_default().limit = Some(limit);
        tracing::info!(%chat, %limit, "quota limit set");
        Ok(())
    }

    /// Deletes limit, consumption and window anchor together. Idempotent;
    /// removing an absent limit is a no-op. Returns whether a limit was
    /// configured: an `Always` ledger may hold consumption for a chat that
    /// never had one, and that does not count as a removed limit.
    pub fn remove_limit(&self, chat: ChatId) -> bool {
        self.entries
            .remove(&chat)
            .is_some_and(|(_, entry)| entry.limit.is_some())
    }

    pub fn has_limit(&self, chat: ChatId) -> bool {
        self.entries
            .get(&chat)
            .is_some_and(|entry| entry.limit.is_some())
    }

    pub fn limit(&self, chat: ChatId) -> Option<U> {
        self.entries.get(&chat).and_then(|entry| entry.limit)
    }

    pub fn consume(&self, chat: ChatId, amount: U) {
        self.consume_at(chat, amount, Instant::now());
    }

    /// Records `amount` against the chat's current window, anchoring the
    /// window on first use and resetting it if `now` falls past its end.
    pub fn consume_at(&self, chat: ChatId, amount: U, now: Instant) {
        if self.policy == TrackingPolicy::WhenLimited && !self.has_limit(chat) {
            return;
        }

        let mut entry = self.entries.entry(chat).or_default();
        match entry.window_start {
            None => entry.window_start = Some(now),
            Some(start) if now.saturating_duration_since(start) > self.window => {
                tracing::debug!(%chat, "quota window elapsed, resetting counter");
                entry.consumed = U::ZERO;
                entry.window_start = Some(now);
            }
            Some(_) => {}
        }
        entry.consumed = entry.consumed.add(amount);
    }

    /// True when no limit is configured or strictly under it. Reaching the
    /// limit exactly means no further consumption is permitted.
    pub fn is_within_limit(&self, chat: ChatId) -> bool {
        match self.entries.get(&chat) {
            None => true,
            Some(entry) => match entry.limit {
                None => true,
                Some(limit) => entry.consumed < limit,
            },
        }
    }

    /// Remaining budget against the stored counter. Deliberately does not
    /// roll the window: the figure may be stale until the next consume.
    pub fn remaining(&self, chat: ChatId) -> Capacity<U> {
        match self.entries.get(&chat) {
            None => Capacity::Unbounded,
            Some(entry) => match entry.limit {
                None => Capacity::Unbounded,
                Some(limit) => Capacity::Limited(limit.sub_floor_zero(entry.consumed)),
            },
        }
    }

    pub fn consumed(&self, chat: ChatId) -> U {
        self.entries
            .get(&chat)
            .map(|entry| entry.consumed)
            .unwrap_or(U::ZERO)
    }

    /// Snapshot of every chat with ledger state, for admin displays.
    pub fn snapshot(&self) -> Vec<QuotaSnapshot<U>> {
        self.entries
            .iter()
            .map(|entry| QuotaSnapshot {
                chat: *entry.key(),
                limit: entry.limit,
                consumed: entry.consumed,
                within_limit: entry.limit.is_none_or(|limit| entry.consumed < limit),
            })
            .collect()
    }
}
