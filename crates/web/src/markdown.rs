//! Minimal markdown-to-HTML transform
//!
//! Four ordered, global substitutions: `**bold**`, `*italic*`, `` `code` ``
//! and newlines. Patterns are lazy and never span a line terminator
//! (`\n`, `\r`, U+2028 or U+2029). Anything else, including raw HTML,
//! passes through untouched.

use regex::Regex;
use std::sync::LazyLock;

/// Any run of characters short of a line terminator (`\n`, `\r`, U+2028, U+2029)
const SPAN: &str = r"([^\n\r\u{2028}\u{2029}]*?)";

static RULES: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (compile(&format!(r"\*\*{SPAN}\*\*")), "<strong>${1}</strong>"),
        (compile(&format!(r"\*{SPAN}\*")), "<em>${1}</em>"),
        (compile(&format!(r"`{SPAN}`")), "<code>${1}</code>"),
        (compile(r"\n"), "<br>"),
    ]
});

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed literals above
    Regex::new(pattern).expect("markdown pattern is valid")
}

/// Render the markdown subset to HTML
pub fn parse_markdown(text: &str) -> String {
    let mut html = text.to_string();
    for (pattern, replacement) in RULES.iter() {
        html = pattern.replace_all(&html, *replacement).into_owned();
    }
    html
}

/// Escape HTML special characters, then render the markdown subset
///
/// Use for text that did not come from a trusted source.
pub fn parse_markdown_escaped(text: &str) -> String {
    parse_markdown(&escape_html(text))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
