//! Marker line syntax.
//!
//! - Opening: `{% name params %}`
//! - Closing: `{% endname %}` (whitespace allowed around `end` and the name)
//!
//! Both may be indented. Text after the closing `%}` is ignored.

use std::sync::LazyLock;

use regex::Regex;

static OPEN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{%\s*(\w+)(.*?)%\}").unwrap());

static CLOSE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{%\s*end\s*(\w+)\s*%\}").unwrap());

/// A parsed opening marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenMarker<'a> {
    pub name: &'a str,
    /// Raw text between the name and `%}`, trimmed.
    pub params: &'a str,
}

/// Parse a line as an opening marker.
pub(crate) fn parse_open(line: &str) -> Option<OpenMarker<'_>> {
    let caps = OPEN_MARKER.captures(line)?;
    Some(OpenMarker {
        name: caps.get(1)?.as_str(),
        params: caps.get(2).map_or("", |m| m.as_str().trim()),
    })
}

/// Check whether a line opens a block with the given tag name.
pub(crate) fn opens(line: &str, name: &str) -> bool {
    parse_open(line).is_some_and(|marker| marker.name == name)
}

/// Check whether a line closes a block with the given tag name.
pub(crate) fn closes(line: &str, name: &str) -> bool {
    CLOSE_MARKER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|m| m.as_str() == name)
}
