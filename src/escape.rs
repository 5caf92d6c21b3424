//! HTML escaping for user-authored transcript text.

/// Substitutions in the order they are applied. `&` must stay first so the
/// entities produced by later rules are not escaped a second time.
const ESCAPES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
];

/// Escape text so it is inert when inserted as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = text.to_string();
    for (from, to) in ESCAPES {
        if escaped.contains(from) {
            escaped = escaped.replace(from, to);
        }
    }
    escaped
}
