//! Line-oriented view for one-shot use outside the TUI.

use std::io::Write;

use crate::controller::ChatView;
use crate::events::{Bubble, ChatRole};
use crate::ui::conversation::markup;

/// Prints each bubble as it is appended. There is no input field: the
/// message is passed to the controller directly, so the input methods are
/// inert.
pub struct PlainView<W: Write> {
    out: W,
    loading: bool,
}

impl<W: Write> PlainView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, bubble: &Bubble) -> std::io::Result<()> {
        let preserve_newlines = bubble.role == ChatRole::User;
        writeln!(self.out, "{}:", bubble.role.display_name())?;
        for line in markup::plain_lines(&bubble.markup, preserve_newlines) {
            writeln!(self.out, "  {line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> ChatView for PlainView<W> {
    fn input_text(&self) -> String {
        String::new()
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    fn append_bubble(&mut self, bubble: Bubble) {
        if let Err(e) = self.print(&bubble) {
            tracing::warn!(error = %e, "failed to print bubble");
        }
    }

    fn scroll_to_end(&mut self) {}

    fn set_send_enabled(&mut self, _enabled: bool) {}

    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }
}
