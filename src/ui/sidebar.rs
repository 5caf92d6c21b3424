//! Collapsible sidebar with connection details and key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::ui::conversation::get_help_text;

/// What the sidebar shows about the session
#[derive(Debug, Clone)]
pub struct SidebarInfo {
    pub title: String,
    pub server: String,
    pub contact_email: String,
}

/// Sidebar visibility state.
#[derive(Debug, Clone)]
pub struct SidebarState {
    pub visible: bool,
}

impl SidebarState {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    /// Toggle visibility (Ctrl+B).
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Close, e.g. on Esc. Returns whether anything changed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    /// Render the sidebar. `overlay` clears what is underneath first, for
    /// terminals too narrow to split.
    pub fn render(&self, area: Rect, buf: &mut Buffer, info: &SidebarInfo, overlay: bool) {
        if !self.visible {
            return;
        }
        if overlay {
            Clear.render(area, buf);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", info.title),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        let mut lines = vec![
            Line::from(Span::styled("Server", Style::default().fg(Color::DarkGray))),
            Line::from(info.server.clone()),
            Line::from(""),
            Line::from(Span::styled("Contact", Style::default().fg(Color::DarkGray))),
            Line::from(info.contact_email.clone()),
            Line::from(""),
        ];
        lines.extend(get_help_text().lines().map(|line| Line::from(line.to_string())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Esc to close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
