//! Conversation UI components for chat interface

pub mod commands;
pub mod composer;
pub mod markup;
pub mod screen;
pub mod spinner;
pub mod transcript;

pub use commands::{get_help_text, ParsedCommand, SlashCommand};
pub use composer::{ComposerResult, ConversationComposer};
pub use screen::ChatScreen;
pub use spinner::LoadingIndicator;
pub use transcript::Transcript;
