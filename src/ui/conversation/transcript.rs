//! Transcript pane: the ordered, append-only log of chat bubbles

use crate::events::{Bubble, ChatRole};
use crate::ui::conversation::markup;
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Margin, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

/// A bubble together with its painted lines
#[derive(Debug, Clone)]
struct Entry {
    bubble: Bubble,
    lines: Vec<Line<'static>>,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    /// Stick to the bottom on every render
    follow: bool,
    /// First visible row when not following
    offset: u16,
    /// Largest valid offset seen by the last render
    max_offset: u16,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            follow: true,
            offset: 0,
            max_offset: 0,
        }
    }

    /// Append a bubble. Its markup is painted once, here.
    pub fn push(&mut self, bubble: Bubble) {
        let (base, preserve_newlines) = match bubble.role {
            ChatRole::User => (Style::default().fg(Color::Blue), true),
            ChatRole::Bot => (Style::default().fg(Color::Green), false),
        };
        let lines = markup::paint(&bubble.markup, base, preserve_newlines);
        self.entries.push(Entry { bubble, lines });
    }

    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.entries.iter().map(|entry| &entry.bubble)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn scroll_up(&mut self, rows: u16) {
        if self.follow {
            self.follow = false;
            self.offset = self.max_offset;
        }
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        if self.follow {
            return;
        }
        self.offset = self.offset.saturating_add(rows);
        if self.offset >= self.max_offset {
            self.follow = true;
        }
    }

    pub fn scroll_to_end(&mut self) {
        self.follow = true;
    }

    /// Scroll range for `total` wrapped rows in a `height`-row pane. Ratatui
    /// scroll offsets are `u16`, so very long sessions saturate at the cap.
    fn max_offset_for(total: usize, height: u16) -> u16 {
        u16::try_from(total)
            .unwrap_or(u16::MAX)
            .saturating_sub(height)
    }

    fn header(bubble: &Bubble) -> Line<'static> {
        let icon = match bubble.role {
            ChatRole::User => "👤",
            ChatRole::Bot => "🤖",
        };
        let timestamp = bubble.created_at.with_timezone(&Local).format("%H:%M:%S");
        Line::from(Span::styled(
            format!("{} {} {} {}", icon, bubble.role.display_name(), timestamp, "─".repeat(12)),
            Style::default().fg(Color::DarkGray),
        ))
    }

    fn welcome() -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled("Welcome! 👋", Style::default().fg(Color::Green))),
            Line::from(""),
            Line::from(Span::styled(
                "Type a message below and press Enter.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Shift+Enter for a new line, /help for commands.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }

    /// Render the transcript with an optional trailing line (the loading
    /// indicator sits after the last bubble).
    pub fn render_with(&mut self, area: Rect, buf: &mut Buffer, trailer: Option<Line<'static>>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 Conversation");
        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() && trailer.is_none() {
            Paragraph::new(Self::welcome()).render(inner_area, buf);
            return;
        }

        let mut all_lines: Vec<Line<'static>> = Vec::new();
        for entry in &self.entries {
            all_lines.push(Self::header(&entry.bubble));
            for line in &entry.lines {
                let mut spans = vec![Span::raw("  ")];
                spans.extend(line.spans.iter().cloned());
                all_lines.push(Line::from(spans));
            }
            all_lines.push(Line::from(""));
        }
        if let Some(trailer) = trailer {
            all_lines.push(trailer);
        }

        let paragraph = Paragraph::new(Text::from(all_lines)).wrap(Wrap { trim: false });
        let total = paragraph.line_count(inner_area.width);
        self.max_offset = Self::max_offset_for(total, inner_area.height);

        if !self.follow && self.offset >= self.max_offset {
            self.follow = true;
        }
        let offset = if self.follow { self.max_offset } else { self.offset };

        paragraph.scroll((offset, 0)).render(inner_area, buf);

        if self.max_offset > 0 {
            let mut state = ScrollbarState::new(self.max_offset as usize).position(offset as usize);
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .render(area.inner(&Margin { vertical: 1, horizontal: 0 }), buf, &mut state);
        }
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::escape_html;

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf.get(x, y).symbol())
            .collect::<String>()
    }

    fn screen(buf: &Buffer) -> String {
        (0..buf.area.height).map(|y| row(buf, y)).collect::<Vec<_>>().join("\n")
    }

    fn user(text: &str) -> Bubble {
        Bubble::new(ChatRole::User, escape_html(text))
    }

    #[test]
    fn test_welcome_when_empty() {
        let mut transcript = Transcript::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 8));
        transcript.render_with(buf.area, &mut buf, None);
        assert!(screen(&buf).contains("Welcome!"));
    }

    #[test]
    fn test_user_markup_is_shown_literally() {
        let mut transcript = Transcript::new();
        transcript.push(user("<i>not italic</i>"));
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 8));
        transcript.render_with(buf.area, &mut buf, None);
        assert!(screen(&buf).contains("<i>not italic</i>"));
    }

    #[test]
    fn test_follows_end_and_shows_trailer() {
        let mut transcript = Transcript::new();
        for i in 0..20 {
            transcript.push(user(&format!("message {i}")));
        }
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 10));
        transcript.render_with(buf.area, &mut buf, Some(Line::from("loading")));

        let text = screen(&buf);
        assert!(text.contains("message 19"));
        assert!(text.contains("loading"));
        assert!(!text.contains("message 0 "));
    }

    #[test]
    fn test_scroll_up_then_back_to_end() {
        let mut transcript = Transcript::new();
        for i in 0..20 {
            transcript.push(user(&format!("message {i}")));
        }
        let area = Rect::new(0, 0, 40, 10);

        let mut buf = Buffer::empty(area);
        transcript.render_with(area, &mut buf, None);
        transcript.scroll_up(1000);
        assert!(!transcript.is_following());

        let mut buf = Buffer::empty(area);
        transcript.render_with(area, &mut buf, None);
        assert!(screen(&buf).contains("message 0"));

        transcript.scroll_to_end();
        let mut buf = Buffer::empty(area);
        transcript.render_with(area, &mut buf, None);
        assert!(screen(&buf).contains("message 19"));
    }

    #[test]
    fn test_scroll_down_past_end_resumes_following() {
        let mut transcript = Transcript::new();
        for i in 0..20 {
            transcript.push(user(&format!("message {i}")));
        }
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        transcript.render_with(area, &mut buf, None);

        transcript.scroll_up(3);
        transcript.scroll_down(10);
        assert!(transcript.is_following());
    }

    #[test]
    fn test_max_offset_saturates_on_huge_transcripts() {
        assert_eq!(Transcript::max_offset_for(30, 10), 20);
        assert_eq!(Transcript::max_offset_for(5, 10), 0);
        assert_eq!(Transcript::max_offset_for(65_536 + 100, 10), u16::MAX - 10);
        assert_eq!(Transcript::max_offset_for(usize::MAX, 0), u16::MAX);
    }

    #[test]
    fn test_bubbles_keep_order() {
        let mut transcript = Transcript::new();
        transcript.push(user("first"));
        transcript.push(Bubble::new(ChatRole::Bot, "<p>second</p>".to_string()));
        let markups: Vec<&str> = transcript.bubbles().map(|b| b.markup.as_str()).collect();
        assert_eq!(markups, vec!["first", "<p>second</p>"]);
        assert_eq!(transcript.len(), 2);
    }
}
