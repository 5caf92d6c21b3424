//! Contact modal: shows the contact address and copies it on request.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    None,
    Close,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFeedback {
    Copied,
    Failed,
}

impl CopyFeedback {
    fn label(self) -> &'static str {
        match self {
            CopyFeedback::Copied => "✔ Copied!",
            CopyFeedback::Failed => "✘ Copy failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactModal {
    email: String,
    open: bool,
    /// Feedback and the ticks left before it reverts
    feedback: Option<(CopyFeedback, u16)>,
}

impl ContactModal {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            open: false,
            feedback: None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.feedback = None;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn handle_key(&self, key: KeyEvent) -> ContactAction {
        if key.kind != KeyEventKind::Press {
            return ContactAction::None;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => ContactAction::Close,
            KeyCode::Char('c') | KeyCode::Char('y') | KeyCode::Enter => ContactAction::Copy,
            _ => ContactAction::None,
        }
    }

    /// Show copy feedback for `ticks` ticks.
    pub fn show_feedback(&mut self, feedback: CopyFeedback, ticks: u16) {
        self.feedback = Some((feedback, ticks.max(1)));
    }

    pub fn feedback(&self) -> Option<CopyFeedback> {
        self.feedback.map(|(feedback, _)| feedback)
    }

    pub fn tick(&mut self) {
        if let Some((_, left)) = self.feedback.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                self.feedback = None;
            }
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if !self.open {
            return;
        }

        let popup_width = 44.min(area.width.saturating_sub(4));
        let popup_height = 7.min(area.height.saturating_sub(2));
        let popup_x = area.x + area.width.saturating_sub(popup_width) / 2;
        let popup_y = area.y + area.height.saturating_sub(popup_height) / 2;
        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Contact ");

        let status = match self.feedback() {
            Some(feedback @ CopyFeedback::Copied) => {
                Span::styled(feedback.label(), Style::default().fg(Color::Green))
            }
            Some(feedback @ CopyFeedback::Failed) => {
                Span::styled(feedback.label(), Style::default().fg(Color::Red))
            }
            None => Span::styled("c copy · Esc close", Style::default().fg(Color::DarkGray)),
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.email.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(status),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .render(popup_area, buf);
    }
}
