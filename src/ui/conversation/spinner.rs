use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const DOTS: [&str; 4] = [".", "..", "...", "   "];

/// Loading indicator shown at the end of the transcript while a reply is
/// pending. Animated by ticks from the event loop.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    label: String,
    visible: bool,
    frame: usize,
}

impl LoadingIndicator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            visible: false,
            frame: 0,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible && !self.visible {
            self.frame = 0;
        }
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn tick(&mut self) {
        if self.visible {
            self.frame = (self.frame + 1) % DOTS.len();
        }
    }

    /// The indicator line, or `None` while hidden
    pub fn line(&self) -> Option<Line<'static>> {
        if !self.visible {
            return None;
        }

        Some(Line::from(vec![
            Span::styled("🤖 ", Style::default().fg(Color::Green)),
            Span::styled(self.label.clone(), Style::default().fg(Color::Green)),
            Span::styled(DOTS[self.frame], Style::default().fg(Color::Yellow)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(indicator: &LoadingIndicator) -> Option<String> {
        indicator
            .line()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
    }

    #[test]
    fn test_hidden_by_default() {
        let indicator = LoadingIndicator::new("Thinking");
        assert!(!indicator.is_visible());
        assert!(indicator.line().is_none());
    }

    #[test]
    fn test_ticks_cycle_dots() {
        let mut indicator = LoadingIndicator::new("Thinking");
        indicator.set_visible(true);
        assert_eq!(text(&indicator).as_deref(), Some("🤖 Thinking."));
        indicator.tick();
        indicator.tick();
        assert_eq!(text(&indicator).as_deref(), Some("🤖 Thinking..."));
        for _ in 0..2 {
            indicator.tick();
        }
        assert_eq!(text(&indicator).as_deref(), Some("🤖 Thinking."));
    }

    #[test]
    fn test_ticks_do_nothing_while_hidden() {
        let mut indicator = LoadingIndicator::new("Thinking");
        indicator.tick();
        indicator.set_visible(true);
        assert_eq!(text(&indicator).as_deref(), Some("🤖 Thinking."));
    }
}
