use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::protocol::ChatReply;
use crate::transport::TransportError;

/// Internal application events for coordinating between the event loop and
/// background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A chat request finished, successfully or not
    ReplySettled {
        request_id: Uuid,
        outcome: Result<ChatReply, TransportError>,
    },
}

/// TUI-specific events (keyboard, mouse, etc.)
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Key press event
    Key(crossterm::event::KeyEvent),

    /// Paste event
    Paste(String),

    /// Terminal resize
    Resize(u16, u16),

    /// Animation / feedback timer
    Tick,
}

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Bot => "Bot",
        }
    }
}

/// A message as authored, before any escaping or rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: ChatRole,
    pub raw_text: String,
}

/// A rendered transcript entry. `markup` is an HTML fragment: escaped text
/// for the user, renderer output for the bot.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub role: ChatRole,
    pub markup: String,
    pub created_at: DateTime<Utc>,
}

impl Bubble {
    pub fn new(role: ChatRole, markup: String) -> Self {
        Self {
            role,
            markup,
            created_at: Utc::now(),
        }
    }
}
