//! Per-admin conversation state.

use dashmap::DashMap;

use crate::types::{ChatId, UserId};

/// What the admin menu is currently waiting for from a given user.
///
/// Each awaiting variant carries the chat being configured, since an admin
/// replies in a private conversation while targeting the chat whose menu
/// they opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingMessageLimit {
        chat: ChatId,
    },
    AwaitingSpendLimit {
        chat: ChatId,
    },
    AwaitingDestinationChatId {
        chat: ChatId,
    },
    AwaitingBotDescription {
        chat: ChatId,
    },
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Pending conversation state per admin user. An absent entry means idle.
#[derive(Debug, Default)]
pub struct AdminSessions {
    pending: DashMap<UserId, ConversationState>,
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever the user was previously asked for.
    pub fn begin(&self, user: UserId, state: ConversationState) {
        if state.is_idle() {
            self.pending.remove(&user);
        } else {
            self.pending.insert(user, state);
        }
    }

    /// Consumes the pending state, leaving the user idle.
    pub fn take(&self, user: UserId) -> ConversationState {
        self.pending
            .remove(&user)
            .map(|(_, state)| state)
            .unwrap_or_default()
    }

    pub fn current(&self, user: UserId) -> ConversationState {
        self.pending
            .get(&user)
            .map(|state| *state)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_state() {
        let sessions = AdminSessions::new();
        let user = UserId(1);
        let state = ConversationState::AwaitingMessageLimit { chat: ChatId(10) };

        sessions.begin(user, state);
        assert_eq!(sessions.current(user), state);
        assert_eq!(sessions.take(user), state);
        assert!(sessions.take(user).is_idle());
    }

    #[test]
    fn test_begin_replaces_pending_state() {
        let sessions = AdminSessions::new();
        let user = UserId(2);

        sessions.begin(
            user,
            ConversationState::AwaitingMessageLimit { chat: ChatId(1) },
        );
        sessions.begin(
            user,
            ConversationState::AwaitingSpendLimit { chat: ChatId(1) },
        );
        assert_eq!(
            sessions.take(user),
            ConversationState::AwaitingSpendLimit { chat: ChatId(1) }
        );
    }

    #[test]
    fn test_begin_idle_clears() {
        let sessions = AdminSessions::new();
        let user = UserId(3);
        sessions.begin(
            user,
            ConversationState::AwaitingBotDescription { chat: ChatId(4) },
        );
        sessions.begin(user, ConversationState::Idle);
        assert!(sessions.current(user).is_idle());
    }
}
