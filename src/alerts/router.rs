//! Routing of limit-reached alerts to per-chat oversight destinations.

use dashmap::DashMap;
use thiserror::Error;

use crate::types::{ChatId, QuotaKind};

/// Errors raised while configuring alert routing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlertError {
    /// A chat cannot receive its own limit alerts.
    #[error("chat {chat} cannot be configured as its own alert destination")]
    SelfReference { chat: ChatId },
}

/// Why an alert was not forwarded despite a consumption event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Notifications for the chat are muted.
    Muted,
}

/// Routing decision for one alert. The caller performs the actual message
/// send when the outcome is `Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Forward the alert text to this chat.
    Delivered(ChatId),
    /// Dropped on purpose; do not retry.
    Suppressed(SuppressReason),
    /// No destination configured for the source chat. Logged, not an error.
    Unrouted,
}

impl NotifyOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    pub fn destination(&self) -> Option<ChatId> {
        match self {
            Self::Delivered(chat) => Some(*chat),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RouteEntry {
    destination: Option<ChatId>,
    muted: bool,
}

/// Maps each chat to an optional oversight destination plus a mute flag.
///
/// A chat with no destination simply has no alerting; that is a valid
/// configuration, never a failure.
#[derive(Debug, Default)]
pub struct AlertRouter {
    routes: DashMap<ChatId, RouteEntry>,
}

impl AlertRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects self-loops at configuration time, leaving any prior
    /// destination in place.
    pub fn set_destination(&self, chat: ChatId, destination: ChatId) -> Result<(), AlertError> {
        if chat == destination {
            return Err(AlertError::SelfReference { chat });
        }
        self.routes.entry(chat).or_default().destination = Some(destination);
        tracing::info!(%chat, %destination, "alert destination set");
        Ok(())
    }

    pub fn destination(&self, chat: ChatId) -> Option<ChatId> {
        self.routes.get(&chat).and_then(|entry| entry.destination)
    }

    /// Flips the mute flag, returning the new muted state.
    pub fn toggle_mute(&self, chat: ChatId) -> bool {
        let mut entry = self.routes.entry(chat).or_default();
        entry.muted = !entry.muted;
        entry.muted
    }

    pub fn is_enabled(&self, chat: ChatId) -> bool {
        !self.routes.get(&chat).is_some_and(|entry| entry.muted)
    }

    /// Decides whether and where a limit alert for `chat` goes.
    pub fn notify(&self, chat: ChatId, kind: QuotaKind) -> NotifyOutcome {
        if !self.is_enabled(chat) {
            tracing::debug!(%chat, %kind, "limit alert suppressed, notifications muted");
            return NotifyOutcome::Suppressed(SuppressReason::Muted);
        }
        match self.destination(chat) {
            Some(destination) => {
                tracing::info!(%chat, %destination, %kind, "routing limit alert");
                NotifyOutcome::Delivered(destination)
            }
            None => {
                tracing::info!(%chat, %kind, "no destination chat configured for limit alert");
                NotifyOutcome::Unrouted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_reference_rejected() {
        let router = AlertRouter::new();
        let chat = ChatId(42);

        assert_eq!(
            router.set_destination(chat, chat),
            Err(AlertError::SelfReference { chat })
        );
        assert_eq!(router.destination(chat), None);

        // A prior destination survives a rejected reconfiguration.
        router.set_destination(chat, ChatId(7)).unwrap();
        assert!(router.set_destination(chat, chat).is_err());
        assert_eq!(router.destination(chat), Some(ChatId(7)));
    }

    #[test]
    fn test_unrouted_without_destination() {
        let router = AlertRouter::new();
        assert_eq!(
            router.notify(ChatId(1), QuotaKind::Messages),
            NotifyOutcome::Unrouted
        );
    }

    #[test]
    fn test_mute_toggle_round_trip() {
        let router = AlertRouter::new();
        let chat = ChatId(5);
        router.set_destination(chat, ChatId(99)).unwrap();

        assert!(router.is_enabled(chat));
        assert!(router.toggle_mute(chat));
        assert!(!router.is_enabled(chat));
        assert_eq!(
            router.notify(chat, QuotaKind::Messages),
            NotifyOutcome::Suppressed(SuppressReason::Muted)
        );

        assert!(!router.toggle_mute(chat));
        assert!(router.is_enabled(chat));
        let outcome = router.notify(chat, QuotaKind::Messages);
        assert_eq!(outcome, NotifyOutcome::Delivered(ChatId(99)));
        assert_eq!(outcome.destination(), Some(ChatId(99)));
    }

    #[test]
    fn test_mute_without_destination_still_suppresses() {
        let router = AlertRouter::new();
        let chat = ChatId(6);
        router.toggle_mute(chat);
        // Mute wins over the missing destination.
        assert_eq!(
            router.notify(chat, QuotaKind::Spend),
            NotifyOutcome::Suppressed(SuppressReason::Muted)
        );
    }
}
