//! One-shot limit alerting to oversight chats.

mod router;

pub use router::{AlertError, AlertRouter, NotifyOutcome, SuppressReason};
