use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
/// They are handled locally and never reach the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Show help
    Help,
    /// Open the contact dialog
    Contact,
    /// Show or hide the sidebar
    Sidebar,
    /// Exit the application
    Quit,
}

pub fn command_entries() -> Vec<CommandEntry> {
    SlashCommand::iter()
        .map(|command| CommandEntry {
            command,
            keyword: command.command(),
            description: command.description(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub command: SlashCommand,
    pub keyword: &'static str,
    pub description: &'static str,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Help => "show available commands and keys",
            SlashCommand::Contact => "show the contact address",
            SlashCommand::Sidebar => "show or hide the sidebar",
            SlashCommand::Quit => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input. No command takes arguments;
/// trailing words are ignored.
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;
    let head = rest.split_whitespace().next()?;

    let command = SlashCommand::from_str(head).ok().or_else(|| match head.to_lowercase().as_str() {
        "q" | "exit" | "bye" => Some(SlashCommand::Quit),
        "h" | "?" => Some(SlashCommand::Help),
        "c" | "email" => Some(SlashCommand::Contact),
        "s" | "menu" => Some(SlashCommand::Sidebar),
        _ => None,
    })?;

    Some(ParsedCommand { command })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Commands:\n\n");
    for entry in command_entries() {
        help.push_str(&format!("/{} - {}\n", entry.keyword, entry.description));
    }

    help.push_str("\nKeys: Enter send · Shift+Enter new line · PgUp/PgDn scroll");
    help.push_str("\n      Ctrl+B sidebar · Ctrl+K contact · Ctrl+C quit");

    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_command() {
        let parsed = parse_slash_command("/help").unwrap();
        assert_eq!(parsed.command, SlashCommand::Help);
    }

    #[test]
    fn test_parse_alias_ignores_trailing_words() {
        let parsed = parse_slash_command("  /q now please ").unwrap();
        assert_eq!(parsed, ParsedCommand { command: SlashCommand::Quit });
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert!(parse_slash_command("what is /help?").is_none());
        assert!(parse_slash_command("/unknown").is_none());
        assert!(parse_slash_command("/").is_none());
    }

    #[test]
    fn test_keywords_are_kebab_case() {
        let keywords: Vec<&str> = command_entries().iter().map(|e| e.keyword).collect();
        assert_eq!(keywords, vec!["help", "contact", "sidebar", "quit"]);
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = get_help_text();
        for entry in command_entries() {
            assert!(help.contains(&format!("/{}", entry.keyword)));
        }
    }
}
