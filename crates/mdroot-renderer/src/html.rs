//! HTML helpers shared by tag renderers and the pipeline.

use std::borrow::Cow;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// Markdown extensions enabled for every render.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Escape text for use in HTML content or attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render a single line of markdown as inline content.
///
/// Block syntax at the start of the line (headings, list items, quotes,
/// rules, fences) is escaped, so the result never contains block elements.
#[must_use]
pub fn render_inline(markdown: &str) -> String {
    let line = escape_block_start(markdown.trim());
    let events = Parser::new_ext(&line, markdown_options()).filter(|event| {
        !matches!(
            event,
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
        )
    });
    let mut out = String::with_capacity(line.len());
    html::push_html(&mut out, events);
    out.trim_end().to_owned()
}

/// Backslash-escape the character that would make `line` open a block.
fn escape_block_start(line: &str) -> Cow<'_, str> {
    match block_marker_at(line) {
        Some(at) => Cow::Owned(format!("{}\\{}", &line[..at], &line[at..])),
        None => Cow::Borrowed(line),
    }
}

/// Byte offset of the punctuation that starts a block construct.
fn block_marker_at(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let first = *bytes.first()?;
    let ends_marker = |len: usize| matches!(bytes.get(len), None | Some(b' ' | b'\t'));

    match first {
        b'>' => Some(0),
        b'#' => {
            let level = bytes.iter().take_while(|&&b| b == b'#').count();
            (level <= 6 && ends_marker(level)).then_some(0)
        }
        b'-' | b'+' | b'*' | b'_' if ends_marker(1) || is_thematic_break(line) => Some(0),
        b'`' | b'~' => {
            let run = bytes.iter().take_while(|&&b| b == first).count();
            let info = &line[run..];
            (run >= 3 && !(first == b'`' && info.contains('`'))).then_some(0)
        }
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            (digits <= 9 && matches!(bytes.get(digits), Some(b'.' | b')')) && ends_marker(digits + 1))
                .then_some(digits)
        }
        _ => None,
    }
}

/// Three or more of the same `-`, `*` or `_`, optionally spaced.
pub(crate) fn is_thematic_break(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(mark) = marks.next().filter(|c| matches!(c, '-' | '*' | '_')) else {
        return false;
    };
    let mut count = 1;
    for c in marks {
        if c != mark {
            return false;
        }
        count += 1;
    }
    count >= 3
}
