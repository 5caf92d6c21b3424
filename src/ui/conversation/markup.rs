//! Paints transcript markup (HTML fragments) as styled terminal lines.
//!
//! Bubbles hold markup, not text: escaped user input or renderer output. The
//! fragment is parsed with `scraper`, so entities come back as the literal
//! characters they stand for and no tag in user text is ever interpreted.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use scraper::{ElementRef, Html, Node};

/// Paint a markup fragment. With `preserve_newlines` the newlines of text
/// nodes become line breaks (user input); otherwise whitespace collapses the
/// way a browser would collapse it outside `<pre>`.
pub fn paint(markup: &str, base: Style, preserve_newlines: bool) -> Vec<Line<'static>> {
    let fragment = Html::parse_fragment(markup);
    let mut painter = Painter::new(base, preserve_newlines);
    painter.walk(fragment.root_element());
    painter.finish()
}

/// Plain text of a markup fragment, one string per painted line.
pub fn plain_lines(markup: &str, preserve_newlines: bool) -> Vec<String> {
    paint(markup, Style::default(), preserve_newlines)
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
        .collect()
}

struct Painter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    preserve_newlines: bool,
    pre_depth: usize,
    quote_depth: usize,
    /// `None` for bullets, `Some(next)` for ordered lists
    lists: Vec<Option<u64>>,
    marker: Option<String>,
}

impl Painter {
    fn new(base: Style, preserve_newlines: bool) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            styles: vec![base],
            preserve_newlines,
            pre_depth: 0,
            quote_depth: 0,
            lists: Vec::new(),
            marker: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                self.element(child_element);
            } else if let Node::Text(text) = child.value() {
                self.text(text);
            }
        }
    }

    fn styled(&mut self, element: ElementRef<'_>, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
        self.walk(element);
        self.styles.pop();
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            "p" | "div" => {
                self.block_start();
                self.walk(element);
                self.block_end(true);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.block_start();
                let mut heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                if matches!(name, "h1" | "h2") {
                    heading = heading.add_modifier(Modifier::UNDERLINED);
                }
                self.styled(element, heading);
                self.block_end(true);
            }
            "pre" => {
                self.block_start();
                self.pre_depth += 1;
                self.styled(element, Style::default().fg(Color::Yellow));
                self.pre_depth -= 1;
                self.block_end(true);
            }
            "code" => {
                if self.pre_depth > 0 {
                    self.walk(element);
                } else {
                    self.styled(element, Style::default().fg(Color::Yellow));
                }
            }
            "strong" | "b" => self.styled(element, Style::default().add_modifier(Modifier::BOLD)),
            "em" | "i" => self.styled(element, Style::default().add_modifier(Modifier::ITALIC)),
            "del" | "s" => {
                self.styled(element, Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            "a" => {
                self.styled(
                    element,
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                );
                let label: String = element.text().collect();
                if let Some(href) = element.value().attr("href") {
                    if !href.is_empty() && href != label.trim() {
                        self.current.push(Span::styled(
                            format!(" ({href})"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
            }
            "br" => self.break_line(),
            "hr" => {
                self.block_start();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                )));
                self.block_end(true);
            }
            "ul" | "ol" => {
                self.block_start();
                let start = if name == "ol" {
                    Some(
                        element
                            .value()
                            .attr("start")
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(1),
                    )
                } else {
                    None
                };
                self.lists.push(start);
                self.walk(element);
                self.lists.pop();
                self.block_end(self.lists.is_empty());
            }
            "li" => {
                self.block_start();
                self.marker = Some(match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                });
                self.walk(element);
                self.block_end(false);
            }
            "blockquote" => {
                self.block_start();
                self.quote_depth += 1;
                self.styled(
                    element,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                );
                self.quote_depth -= 1;
                self.block_end(true);
            }
            "input" => {
                if element.value().attr("type") == Some("checkbox") {
                    let checked = element.value().attr("checked").is_some();
                    let mark = if checked { "[x] " } else { "[ ] " };
                    let style = self.style();
                    self.current.push(Span::styled(mark, style));
                }
            }
            "tr" => {
                self.block_start();
                self.walk(element);
                self.block_end(false);
            }
            "th" | "td" => {
                if !self.current.is_empty() {
                    self.current
                        .push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
                }
                if name == "th" {
                    self.styled(element, Style::default().add_modifier(Modifier::BOLD));
                } else {
                    self.walk(element);
                }
            }
            "table" => {
                self.block_start();
                self.walk(element);
                self.block_end(true);
            }
            _ => self.walk(element),
        }
    }

    fn text(&mut self, text: &str) {
        let style = self.style();
        if self.pre_depth > 0 || self.preserve_newlines {
            for (i, segment) in text.split('\n').enumerate() {
                if i > 0 {
                    self.break_line();
                }
                if !segment.is_empty() {
                    self.current.push(Span::styled(segment.to_string(), style));
                }
            }
            return;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let ends_with_space = |spans: &[Span<'static>]| {
            spans
                .last()
                .map(|span| span.content.ends_with(' '))
                .unwrap_or(true)
        };

        if words.is_empty() {
            if !self.current.is_empty() && !ends_with_space(&self.current) {
                self.current.push(Span::styled(" ", style));
            }
            return;
        }

        let mut collapsed = String::new();
        if text.starts_with(char::is_whitespace) && !ends_with_space(&self.current) {
            collapsed.push(' ');
        }
        collapsed.push_str(&words.join(" "));
        if text.ends_with(char::is_whitespace) {
            collapsed.push(' ');
        }
        self.current.push(Span::styled(collapsed, style));
    }

    fn prefix(&mut self) -> Vec<Span<'static>> {
        let mut prefix = Vec::new();
        if self.quote_depth > 0 {
            prefix.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if !self.lists.is_empty() {
            let indent = "  ".repeat(self.lists.len() - 1);
            match self.marker.take() {
                Some(marker) => prefix.push(Span::raw(format!("{indent}{marker}"))),
                None => prefix.push(Span::raw(format!("{indent}  "))),
            }
        }
        prefix
    }

    /// End the current line unconditionally.
    fn break_line(&mut self) {
        let mut spans = self.prefix();
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    /// End the current line if it has content.
    fn flush(&mut self) {
        if let Some(last) = self.current.last_mut() {
            if last.content.ends_with(' ') {
                let trimmed = last.content.trim_end().to_string();
                last.content = trimmed.into();
            }
        }
        self.current.retain(|span| !span.content.is_empty());
        if !self.current.is_empty() || self.marker.is_some() {
            self.break_line();
        }
    }

    fn block_start(&mut self) {
        self.flush();
    }

    fn block_end(&mut self, spaced: bool) {
        self.flush();
        let last_blank = self
            .lines
            .last()
            .map(|line| line.spans.iter().all(|span| span.content.trim().is_empty()))
            .unwrap_or(true);
        if spaced && !last_blank {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|span| span.content.trim().is_empty()))
        {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::escape_html;
    use crate::markdown::{CommonMarkRenderer, MarkdownRenderer};

    fn bot(markdown: &str) -> Vec<String> {
        plain_lines(&CommonMarkRenderer::new().render(markdown), false)
    }

    #[test]
    fn test_escaped_user_text_reads_literally() {
        let markup = escape_html("<b>bold?</b> & 'quotes'");
        assert_eq!(plain_lines(&markup, true), vec!["<b>bold?</b> & 'quotes'"]);
    }

    #[test]
    fn test_user_newlines_are_kept() {
        let markup = escape_html("first\nsecond");
        assert_eq!(plain_lines(&markup, true), vec!["first", "second"]);
    }

    #[test]
    fn test_bold_is_styled() {
        let lines = paint(
            &CommonMarkRenderer::new().render("say **hi** now"),
            Style::default(),
            false,
        );
        assert_eq!(lines.len(), 1);
        let bold = lines[0]
            .spans
            .iter()
            .find(|span| span.content.as_ref() == "hi")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_inline_spacing_survives() {
        assert_eq!(bot("a *b* c"), vec!["a b c"]);
    }

    #[test]
    fn test_paragraphs_are_separated() {
        assert_eq!(bot("one\n\ntwo"), vec!["one", "", "two"]);
    }

    #[test]
    fn test_lists() {
        assert_eq!(bot("- apple\n- pear\n"), vec!["• apple", "• pear"]);
        assert_eq!(bot("3. c\n4. d\n"), vec!["3. c", "4. d"]);
    }

    #[test]
    fn test_code_block_keeps_lines() {
        assert_eq!(
            bot("```\nfn main() {\n\n}\n```\n"),
            vec!["fn main() {", "", "}"]
        );
    }

    #[test]
    fn test_link_shows_target() {
        assert_eq!(
            bot("[notices](https://example.org/n)"),
            vec!["notices (https://example.org/n)"]
        );
    }

    #[test]
    fn test_blockquote_prefix() {
        assert_eq!(bot("> quoted"), vec!["│ quoted"]);
    }

    #[test]
    fn test_empty_markup_paints_one_line() {
        assert_eq!(plain_lines("", false), vec![""]);
    }
}
