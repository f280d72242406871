//! # chat-quota
//!
//! Per-chat quota governance for LLM chat bots: a message-count budget and a
//! monetary spend budget per chat, each on an independently resetting 24h
//! rolling window, with one-shot alerting to an oversight chat when a limit
//! is first crossed.
//!
//! Everything is in-memory for the process lifetime. The chat platform layer
//! (message delivery, menus, admin checks) and the LLM client stay outside;
//! this crate only answers "may this chat proceed", "how much is left" and
//! "where does this alert go", and records consumption when told to.
//!
//! ## Quick start
//!
//! ```rust
//! use chat_quota::{AlertRouter, ChatId, NotifyOutcome, QuotaGovernor};
//! use rust_decimal_macros::dec;
//!
//! fn main() -> Result<(), chat_quota::Error> {
//!     let governor = QuotaGovernor::default();
//!     let router = AlertRouter::new();
//!
//!     let chat = ChatId(100);
//!     governor.spend().set_limit(chat, dec!(10))?;
//!     router.set_destination(chat, ChatId(99))?;
//!
//!     assert!(governor.may_proceed(chat));
//!     // ... perform the metered action, get the provider's usage count ...
//!     let record = governor.record_usage(chat, 40);
//!     for kind in record.exceeded_kinds() {
//!         if let NotifyOutcome::Delivered(dest) = router.notify(chat, kind) {
//!             // hand the alert text to the message sender for `dest`
//!             let _ = dest;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod admin;
pub mod alerts;
pub mod config;
pub mod i18n;
pub mod persona;
pub mod quota;
pub mod types;

pub use admin::{AdminAction, AdminMenu, AdminSessions, ConversationState, MenuCommand};
pub use alerts::{AlertError, AlertRouter, NotifyOutcome, SuppressReason};
pub use config::GovernorConfig;
pub use i18n::{I18nError, Translator};
pub use persona::{DEFAULT_PERSONA, PersonaStore};
pub use quota::{
    Capacity, QUOTA_WINDOW, QuotaError, QuotaGovernor, QuotaLedger, QuotaSnapshot, SpendRate,
    TrackingPolicy, UsageRecord,
};
pub use types::{ChatId, QuotaKind, UserId};

/// Crate-level error aggregating the per-component taxonomies. All variants
/// are local and synchronous, surfaced to the presentation layer that issued
/// the configuration call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Alert(#[from] AlertError),

    #[error(transparent)]
    I18n(#[from] I18nError),
}

pub type Result<T> = std::result::Result<T, Error>;
