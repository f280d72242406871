//! Per-chat system-prompt overrides.

use dashmap::DashMap;

use crate::types::ChatId;

/// System prompt used for chats without an override.
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant.";

/// Free-text system-prompt override per chat, falling back to a single
/// crate-wide default. Shares the chat keyspace with the quota components
/// but carries no quota state.
#[derive(Debug)]
pub struct PersonaStore {
    default: String,
    overrides: DashMap<ChatId, String>,
}

impl Default for PersonaStore {
    fn default() -> Self {
        Self::with_default(DEFAULT_PERSONA)
    }
}

impl PersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            overrides: DashMap::new(),
        }
    }

    pub fn set(&self, chat: ChatId, description: impl Into<String>) {
        self.overrides.insert(chat, description.into());
    }

    /// Removes the override, returning it if one existed. Idempotent.
    pub fn remove(&self, chat: ChatId) -> Option<String> {
        self.overrides.remove(&chat).map(|(_, text)| text)
    }

    pub fn override_for(&self, chat: ChatId) -> Option<String> {
        self.overrides.get(&chat).map(|text| text.clone())
    }

    /// The prompt to use for this chat: its override or the default.
    pub fn system_prompt(&self, chat: ChatId) -> String {
        self.override_for(chat)
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_to_default() {
        let store = PersonaStore::new();
        assert_eq!(store.system_prompt(ChatId(1)), DEFAULT_PERSONA);
        assert_eq!(store.override_for(ChatId(1)), None);
    }

    #[test]
    fn test_set_and_remove() {
        let store = PersonaStore::with_default("default prompt");
        let chat = ChatId(2);

        store.set(chat, "You are a pirate.");
        assert_eq!(store.system_prompt(chat), "You are a pirate.");

        assert_eq!(store.remove(chat), Some("You are a pirate.".to_string()));
        assert_eq!(store.system_prompt(chat), "default prompt");
        assert_eq!(store.remove(chat), None);
    }
}
