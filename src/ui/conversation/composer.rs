use crate::ui::conversation::commands::{
    command_entries, parse_slash_command, CommandEntry, ParsedCommand,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    /// Enter on ordinary text while the send control is enabled
    Send,
    Command(ParsedCommand),
    None,
}

/// State for the text area within the composer. `cursor` counts chars, not
/// bytes.
#[derive(Debug, Clone, Default)]
pub struct TextAreaState {
    pub content: String,
    pub cursor: usize,
}

impl TextAreaState {
    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
        true
    }

    fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }
}

/// Message input with a slash-command palette
#[derive(Clone)]
pub struct ConversationComposer {
    state: TextAreaState,
    placeholder: String,
    has_focus: bool,
    send_enabled: bool,
    command_entries: Vec<CommandEntry>,
    filtered_commands: Vec<CommandEntry>,
    show_command_palette: bool,
    selected_command: Option<usize>,
}

impl ConversationComposer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            state: TextAreaState::default(),
            placeholder: placeholder.into(),
            has_focus: true,
            send_enabled: true,
            command_entries: command_entries(),
            filtered_commands: Vec::new(),
            show_command_palette: false,
            selected_command: None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.state.insert_str("\n");
                } else if self.show_command_palette && self.apply_selected_command() {
                    return ComposerResult::None;
                } else if let Some(command) = parse_slash_command(&self.state.content) {
                    // Local commands work even while a send is in flight
                    self.state.clear();
                    self.close_command_palette();
                    return ComposerResult::Command(command);
                } else if self.send_enabled {
                    self.close_command_palette();
                    return ComposerResult::Send;
                }
            }
            KeyCode::Up if self.show_command_palette => self.move_command_selection(-1),
            KeyCode::Down if self.show_command_palette => self.move_command_selection(1),
            KeyCode::Esc if self.show_command_palette => self.close_command_palette(),
            KeyCode::Tab if self.show_command_palette => {
                self.apply_selected_command();
            }
            KeyCode::Char(c) => {
                self.state.insert_str(c.encode_utf8(&mut [0; 4]));
                self.sync_command_palette();
            }
            KeyCode::Backspace => {
                if self.state.backspace() {
                    self.sync_command_palette();
                }
            }
            KeyCode::Delete => {
                if self.state.delete() {
                    self.sync_command_palette();
                }
            }
            KeyCode::Left => {
                self.state.cursor = self.state.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.state.cursor < self.state.char_len() {
                    self.state.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.state.cursor = 0;
            }
            KeyCode::End => {
                self.state.cursor = self.state.char_len();
            }
            _ => {}
        }

        ComposerResult::None
    }

    /// Insert pasted text at the cursor
    pub fn handle_paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.state.insert_str(&normalized);
        self.sync_command_palette();
    }

    /// Palette is open while the input is a single `/word` being typed
    fn sync_command_palette(&mut self) {
        let content = &self.state.content;
        let typing_command = content.starts_with('/') && !content.contains(char::is_whitespace);
        if !typing_command {
            self.close_command_palette();
            return;
        }
        if !self.show_command_palette {
            self.show_command_palette = true;
            self.selected_command = Some(0);
        }
        self.refresh_command_palette();
    }

    fn close_command_palette(&mut self) {
        self.show_command_palette = false;
        self.filtered_commands.clear();
        self.selected_command = None;
    }

    fn refresh_command_palette(&mut self) {
        let query = self.state.content.trim_start_matches('/').to_lowercase();
        self.filtered_commands = self
            .command_entries
            .iter()
            .filter(|entry| query.is_empty() || entry.keyword.starts_with(&query))
            .copied()
            .collect();

        if self.filtered_commands.is_empty() {
            self.selected_command = None;
        } else {
            let index = self.selected_command.unwrap_or(0);
            self.selected_command = Some(index.min(self.filtered_commands.len() - 1));
        }
    }

    fn move_command_selection(&mut self, delta: isize) {
        if self.filtered_commands.is_empty() {
            self.selected_command = None;
            return;
        }

        let len = self.filtered_commands.len() as isize;
        let current = self.selected_command.unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len);
        self.selected_command = Some(next as usize);
    }

    /// Complete the input to the highlighted command
    fn apply_selected_command(&mut self) -> bool {
        let Some(entry) = self
            .selected_command
            .and_then(|index| self.filtered_commands.get(index))
            .copied()
        else {
            return false;
        };

        // Already complete: let Enter run it
        if self.state.content.trim() == format!("/{}", entry.keyword) {
            self.close_command_palette();
            return false;
        }

        self.state.content = format!("/{}", entry.keyword);
        self.state.cursor = self.state.char_len();
        self.close_command_palette();
        true
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn is_palette_open(&self) -> bool {
        self.show_command_palette
    }

    /// Get current content
    pub fn get_content(&self) -> String {
        self.state.content.clone()
    }

    /// Clear content
    pub fn clear(&mut self) {
        self.state.clear();
        self.close_command_palette();
    }

    /// Rows needed to show the content, borders included
    pub fn desired_height(&self, max: u16) -> u16 {
        let rows = self.state.content.split('\n').count().max(1) as u16;
        (rows + 2).clamp(3, max.max(3))
    }

    fn title(&self) -> Line<'static> {
        if self.send_enabled {
            Line::from(" Message · Enter to send ")
        } else {
            Line::from(vec![
                Span::raw(" Message · "),
                Span::styled("sending…", Style::default().fg(Color::Yellow)),
                Span::raw(" "),
            ])
        }
    }
}

impl Widget for &ConversationComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = match (self.send_enabled, self.has_focus) {
            (false, _) => Style::default().fg(Color::DarkGray),
            (true, true) => Style::default().fg(Color::Green),
            (true, false) => Style::default().fg(Color::Gray),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(border_style);

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.state.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            let mut content = self.state.content.clone();
            if self.has_focus {
                content.insert(self.state.byte_index(self.state.cursor), '▌');
            }

            let text_style = if self.send_enabled {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };

            // Keep the cursor row visible when the input outgrows the box
            let rows: Vec<&str> = content.split('\n').collect();
            let height = inner_area.height as usize;
            let cursor_row = content[..content.find('▌').unwrap_or(content.len())]
                .matches('\n')
                .count();
            let first = (cursor_row + 1).saturating_sub(height);

            for (i, line_text) in rows.iter().skip(first).take(height).enumerate() {
                let line = Line::from(Span::styled(line_text.to_string(), text_style));
                buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
            }
        }

        if self.show_command_palette && !self.filtered_commands.is_empty() {
            let palette_height = (self.filtered_commands.len().min(5) + 2) as u16;
            let palette_area = Rect {
                x: area.x,
                y: area.y.saturating_sub(palette_height),
                width: area.width,
                height: palette_height.min(area.y),
            };
            if palette_area.height < 3 {
                return;
            }

            Clear.render(palette_area, buf);
            let block = Block::default()
                .borders(Borders::ALL)
                .title("Commands")
                .border_style(Style::default().fg(Color::Blue));
            let inner = block.inner(palette_area);
            block.render(palette_area, buf);

            for (index, entry) in self.filtered_commands.iter().enumerate() {
                if index >= inner.height as usize {
                    break;
                }

                let style = if self.selected_command == Some(index) {
                    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled(format!("/{}", entry.keyword), style),
                    Span::styled(" - ", Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.description, Style::default().fg(Color::Gray)),
                ]);

                buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
            }
        }
    }
}
