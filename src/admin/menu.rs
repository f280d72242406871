//! Admin menu command handling.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::state::{AdminSessions, ConversationState};
use crate::alerts::AlertRouter;
use crate::persona::PersonaStore;
use crate::quota::{Capacity, QuotaGovernor};
use crate::types::{ChatId, UserId};

/// A pressed admin-menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    SetMessageLimit,
    SetSpendLimit,
    RemoveMessageLimit,
    RemoveSpendLimit,
    ShowMessageLimit,
    ShowSpendLimit,
    ShowRemainingMessages,
    ShowRemainingSpend,
    SetDestination,
    ToggleMute,
    SetBotDescription,
    RemoveBotDescription,
}

/// Outcome of a menu interaction, for the front end to render.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    PromptMessageLimit,
    PromptSpendLimit,
    PromptDestinationChatId,
    PromptBotDescription,
    MessageLimitSet { limit: u64 },
    SpendLimitSet { limit: Decimal },
    MessageLimitRemoved { existed: bool },
    SpendLimitRemoved { existed: bool },
    MessageLimit { limit: Option<u64> },
    SpendLimit { limit: Option<Decimal> },
    RemainingMessages(Capacity<u64>),
    RemainingSpend(Capacity<Decimal>),
    DestinationSet { destination: ChatId },
    MuteToggled { enabled: bool },
    DescriptionSet,
    DescriptionRemoved { existed: bool },
    /// The reply could not be parsed; the pending request was dropped.
    InvalidInput { given: String },
    /// Free text arrived while nothing was being asked of this user.
    NothingPending,
}

/// Drives admin configuration of the core components.
///
/// Button presses either act immediately or park a [`ConversationState`] for
/// the user; the next free-text reply consumes that state exactly once.
/// Admin authorization happens upstream in the chat platform layer.
#[derive(Debug)]
pub struct AdminMenu {
    governor: Arc<QuotaGovernor>,
    router: Arc<AlertRouter>,
    personas: Arc<PersonaStore>,
    sessions: AdminSessions,
}

impl AdminMenu {
    pub fn new(
        governor: Arc<QuotaGovernor>,
        router: Arc<AlertRouter>,
        personas: Arc<PersonaStore>,
    ) -> Self {
        Self {
            governor,
            router,
            personas,
            sessions: AdminSessions::new(),
        }
    }

    pub fn sessions(&self) -> &AdminSessions {
        &self.sessions
    }

    /// Handles a button press from `user` on the menu of `chat`.
    pub fn select(&self, user: UserId, chat: ChatId, command: MenuCommand) -> AdminAction {
        match command {
            MenuCommand::SetMessageLimit => {
                self.sessions
                    .begin(user, ConversationState::AwaitingMessageLimit { chat });
                AdminAction::PromptMessageLimit
            }
            MenuCommand::SetSpendLimit => {
                self.sessions
                    .begin(user, ConversationState::AwaitingSpendLimit { chat });
                AdminAction::PromptSpendLimit
            }
            MenuCommand::SetDestination => {
                self.sessions
                    .begin(user, ConversationState::AwaitingDestinationChatId { chat });
                AdminAction::PromptDestinationChatId
            }
            MenuCommand::SetBotDescription => {
                self.sessions
                    .begin(user, ConversationState::AwaitingBotDescription { chat });
                AdminAction::PromptBotDescription
            }
            MenuCommand::RemoveMessageLimit => AdminAction::MessageLimitRemoved {
                existed: self.governor.messages().remove_limit(chat),
            },
            MenuCommand::RemoveSpendLimit => AdminAction::SpendLimitRemoved {
                existed: self.governor.spend().remove_limit(chat),
            },
            MenuCommand::ShowMessageLimit => AdminAction::MessageLimit {
                limit: self.governor.messages().limit(chat),
            },
            MenuCommand::ShowSpendLimit => AdminAction::SpendLimit {
                limit: self.governor.spend().limit(chat),
            },
            MenuCommand::ShowRemainingMessages => {
                AdminAction::RemainingMessages(self.governor.messages().remaining(chat))
            }
            MenuCommand::ShowRemainingSpend => {
                AdminAction::RemainingSpend(self.governor.spend().remaining(chat))
            }
            MenuCommand::ToggleMute => AdminAction::MuteToggled {
                enabled: !self.router.toggle_mute(chat),
            },
            MenuCommand::RemoveBotDescription => AdminAction::DescriptionRemoved {
                existed: self.personas.remove(chat).is_some(),
            },
        }
    }

    /// Handles a free-text reply from `user`, consuming any pending
    /// conversation state. Configuration errors (invalid limit, self-loop
    /// destination) propagate to the caller; unparsable input is reported
    /// as [`AdminAction::InvalidInput`]. Either way the pending state is
    /// gone afterwards.
    pub fn respond(&self, user: UserId, text: &str) -> Result<AdminAction, crate::Error> {
        let text = text.trim();
        match self.sessions.take(user) {
            ConversationState::Idle => Ok(AdminAction::NothingPending),
            ConversationState::AwaitingMessageLimit { chat } => match text.parse::<u64>() {
                Ok(limit) => {
                    self.governor.messages().set_limit(chat, limit)?;
                    Ok(AdminAction::MessageLimitSet { limit })
                }
                Err(_) => Ok(AdminAction::InvalidInput { given: text.into() }),
            },
            ConversationState::AwaitingSpendLimit { chat } => match text.parse::<Decimal>() {
                Ok(limit) => {
                    self.governor.spend().set_limit(chat, limit)?;
                    Ok(AdminAction::SpendLimitSet { limit })
                }
                Err(_) => Ok(AdminAction::InvalidInput { given: text.into() }),
            },
            ConversationState::AwaitingDestinationChatId { chat } => match text.parse::<i64>() {
                Ok(id) => {
                    let destination = ChatId(id);
                    self.router.set_destination(chat, destination)?;
                    Ok(AdminAction::DestinationSet { destination })
                }
                Err(_) => Ok(AdminAction::InvalidInput { given: text.into() }),
            },
            ConversationState::AwaitingBotDescription { chat } => {
                if text.is_empty() {
                    return Ok(AdminAction::InvalidInput { given: text.into() });
                }
                self.personas.set(chat, text);
                Ok(AdminAction::DescriptionSet)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::alerts::AlertError;
    use crate::quota::QuotaError;

    fn menu() -> AdminMenu {
        AdminMenu::new(
            Arc::new(QuotaGovernor::default()),
            Arc::new(AlertRouter::new()),
            Arc::new(PersonaStore::new()),
        )
    }

    #[test]
    fn test_message_limit_flow() {
        let menu = menu();
        let user = UserId(1);
        let chat = ChatId(10);

        assert_eq!(
            menu.select(user, chat, MenuCommand::SetMessageLimit),
            AdminAction::PromptMessageLimit
        );
        assert_eq!(
            menu.respond(user, "25").unwrap(),
            AdminAction::MessageLimitSet { limit: 25 }
        );
        assert_eq!(
            menu.select(user, chat, MenuCommand::ShowMessageLimit),
            AdminAction::MessageLimit { limit: Some(25) }
        );
        // The pending state was consumed by the first reply.
        assert_eq!(
            menu.respond(user, "30").unwrap(),
            AdminAction::NothingPending
        );
    }

    #[test]
    fn test_spend_limit_flow() {
        let menu = menu();
        let user = UserId(2);
        let chat = ChatId(11);

        menu.select(user, chat, MenuCommand::SetSpendLimit);
        assert_eq!(
            menu.respond(user, "12.50").unwrap(),
            AdminAction::SpendLimitSet {
                limit: dec!(12.50)
            }
        );
        assert_eq!(
            menu.select(user, chat, MenuCommand::ShowRemainingSpend),
            AdminAction::RemainingSpend(Capacity::Limited(dec!(12.50)))
        );
    }

    #[test]
    fn test_invalid_number_clears_state() {
        let menu = menu();
        let user = UserId(3);
        menu.select(user, ChatId(12), MenuCommand::SetMessageLimit);

        assert_eq!(
            menu.respond(user, "not a number").unwrap(),
            AdminAction::InvalidInput {
                given: "not a number".into()
            }
        );
        assert_eq!(
            menu.respond(user, "5").unwrap(),
            AdminAction::NothingPending
        );
    }

    #[test]
    fn test_zero_limit_propagates_error() {
        let menu = menu();
        let user = UserId(4);
        menu.select(user, ChatId(13), MenuCommand::SetMessageLimit);

        let err = menu.respond(user, "0").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Quota(QuotaError::InvalidLimit { .. })
        ));
        // The pending request is gone even on error.
        assert_eq!(
            menu.respond(user, "0").unwrap(),
            AdminAction::NothingPending
        );
    }

    #[test]
    fn test_destination_flow_rejects_self() {
        let menu = menu();
        let user = UserId(5);
        let chat = ChatId(14);

        menu.select(user, chat, MenuCommand::SetDestination);
        let err = menu.respond(user, "14").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Alert(AlertError::SelfReference { .. })
        ));

        menu.select(user, chat, MenuCommand::SetDestination);
        assert_eq!(
            menu.respond(user, "-100200").unwrap(),
            AdminAction::DestinationSet {
                destination: ChatId(-100200)
            }
        );
    }

    #[test]
    fn test_description_flow() {
        let menu = menu();
        let user = UserId(6);
        let chat = ChatId(15);

        menu.select(user, chat, MenuCommand::SetBotDescription);
        assert_eq!(
            menu.respond(user, "You answer in haiku.").unwrap(),
            AdminAction::DescriptionSet
        );
        assert_eq!(
            menu.select(user, chat, MenuCommand::RemoveBotDescription),
            AdminAction::DescriptionRemoved { existed: true }
        );
        assert_eq!(
            menu.select(user, chat, MenuCommand::RemoveBotDescription),
            AdminAction::DescriptionRemoved { existed: false }
        );
    }

    #[test]
    fn test_remove_spend_limit_ignores_limitless_spend_history() {
        let menu = menu();
        let user = UserId(8);
        let chat = ChatId(17);

        // Spend history accrues without any limit configured.
        menu.governor.record_usage(chat, 10);
        assert_eq!(
            menu.select(user, chat, MenuCommand::RemoveSpendLimit),
            AdminAction::SpendLimitRemoved { existed: false }
        );

        menu.select(user, chat, MenuCommand::SetSpendLimit);
        menu.respond(user, "5").unwrap();
        assert_eq!(
            menu.select(user, chat, MenuCommand::RemoveSpendLimit),
            AdminAction::SpendLimitRemoved { existed: true }
        );
    }

    #[test]
    fn test_remove_and_toggle_act_immediately() {
        let menu = menu();
        let user = UserId(7);
        let chat = ChatId(16);

        assert_eq!(
            menu.select(user, chat, MenuCommand::RemoveMessageLimit),
            AdminAction::MessageLimitRemoved { existed: false }
        );
        assert_eq!(
            menu.select(user, chat, MenuCommand::ToggleMute),
            AdminAction::MuteToggled { enabled: false }
        );
        assert_eq!(
            menu.select(user, chat, MenuCommand::ToggleMute),
            AdminAction::MuteToggled { enabled: true }
        );
    }
}
