use crate::controller::ChatView;
use crate::events::Bubble;
use crate::ui::conversation::{ConversationComposer, LoadingIndicator, Transcript};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

const PLACEHOLDER: &str = "Type your message...";

/// The chat surface: transcript on top, composer at the bottom, loading
/// indicator after the last bubble.
pub struct ChatScreen {
    transcript: Transcript,
    composer: ConversationComposer,
    indicator: LoadingIndicator,
}

impl ChatScreen {
    pub fn new() -> Self {
        let mut composer = ConversationComposer::new(PLACEHOLDER);
        composer.set_focus(true);

        Self {
            transcript: Transcript::new(),
            composer,
            indicator: LoadingIndicator::new("Thinking"),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn composer(&self) -> &ConversationComposer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ConversationComposer {
        &mut self.composer
    }

    pub fn indicator(&self) -> &LoadingIndicator {
        &self.indicator
    }

    pub fn tick(&mut self) {
        self.indicator.tick();
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let composer_height = self.composer.desired_height(area.height / 3);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(composer_height)])
            .split(area);

        self.transcript
            .render_with(chunks[0], buf, self.indicator.line());
        (&self.composer).render(chunks[1], buf);
    }
}

impl Default for ChatScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for ChatScreen {
    fn input_text(&self) -> String {
        self.composer.get_content()
    }

    fn clear_input(&mut self) {
        self.composer.clear();
    }

    fn focus_input(&mut self) {
        self.composer.set_focus(true);
    }

    fn append_bubble(&mut self, bubble: Bubble) {
        self.transcript.push(bubble);
    }

    fn scroll_to_end(&mut self) {
        self.transcript.scroll_to_end();
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.composer.set_send_enabled(enabled);
    }

    fn set_loading(&mut self, visible: bool) {
        self.indicator.set_visible(visible);
    }
}
