//! Presentation-layer admin flows.
//!
//! The chat front end renders menus and delivers messages; this module owns
//! only the conversation state behind them and translates admin replies into
//! operations on the core components.

mod menu;
mod state;

pub use menu::{AdminAction, AdminMenu, MenuCommand};
pub use state::{AdminSessions, ConversationState};
