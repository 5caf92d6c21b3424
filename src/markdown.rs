//! Markdown → display markup.
//!
//! The controller inserts renderer output into the transcript verbatim, so a
//! renderer is the trust boundary for bot replies. [`CommonMarkRenderer`]
//! keeps that boundary closed: raw HTML embedded in a reply comes out as
//! escaped text, never as live markup.

use pulldown_cmark::{html, Event, Options, Parser};

/// Converts raw markdown text into markup for the transcript.
pub trait MarkdownRenderer {
    fn render(&self, raw: &str) -> String;
}

/// CommonMark renderer with the GitHub-flavoured extensions chat backends
/// tend to emit.
#[derive(Debug, Clone)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl CommonMarkRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, raw: &str) -> String {
        let parser = Parser::new_ext(raw, self.options).map(|event| match event {
            // Embedded HTML is shown, not interpreted
            Event::Html(text) | Event::InlineHtml(text) => Event::Text(text),
            other => other,
        });

        let mut markup = String::with_capacity(raw.len() * 3 / 2);
        html::push_html(&mut markup, parser);
        markup
    }
}

impl<R: MarkdownRenderer + ?Sized> MarkdownRenderer for &R {
    fn render(&self, raw: &str) -> String {
        (**self).render(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        let renderer = CommonMarkRenderer::new();
        assert_eq!(renderer.render("**hi**"), "<p><strong>hi</strong></p>\n");
    }

    #[test]
    fn test_list_and_code() {
        let renderer = CommonMarkRenderer::new();
        let markup = renderer.render("- one\n- `two`\n");
        assert!(markup.contains("<ul>"));
        assert!(markup.contains("<li>one</li>"));
        assert!(markup.contains("<code>two</code>"));
    }

    #[test]
    fn test_inline_html_is_escaped() {
        let renderer = CommonMarkRenderer::new();
        let markup = renderer.render("click <img src=x onerror=alert(1)> now");
        assert!(!markup.contains("<img"));
        assert!(markup.contains("&lt;img"));
    }

    #[test]
    fn test_html_block_is_escaped() {
        let renderer = CommonMarkRenderer::new();
        let markup = renderer.render("<script>\nalert(1)\n</script>\n");
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_strikethrough_extension() {
        let renderer = CommonMarkRenderer::new();
        assert!(renderer.render("~~gone~~").contains("<del>gone</del>"));
    }
}
