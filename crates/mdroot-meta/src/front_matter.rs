//! Locating the front matter block at the start of a document.

use std::sync::LazyLock;

use regex::Regex;

/// `---` line, optional body, `---` line, anchored at the start of the text.
static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?:([\s\S]*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// A front matter block found at the start of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Raw text between the delimiter lines.
    pub body: &'a str,
    /// Byte offset just past the closing delimiter line.
    pub end: usize,
}

/// Find the front matter block, if the document starts with one.
#[must_use]
pub fn extract(text: &str) -> Option<FrontMatter<'_>> {
    let caps = FRONT_MATTER.captures(text)?;
    let whole = caps.get(0)?;
    Some(FrontMatter {
        body: caps.get(1).map_or("", |m| m.as_str()),
        end: whole.end(),
    })
}

/// Return the document text with any leading front matter removed.
#[must_use]
pub fn strip(text: &str) -> &str {
    extract(text).map_or(text, |fm| &text[fm.end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_body() {
        let text = "---\ntitle: Hi\ntypora-root-url: ./assets\n---\n# Heading\n";
        let fm = extract(text).unwrap();
        assert_eq!(fm.body, "title: Hi\ntypora-root-url: ./assets");
        assert_eq!(&text[fm.end..], "# Heading\n");
    }

    #[test]
    fn test_extract_crlf() {
        let text = "---\r\na: 1\r\n---\r\nbody";
        let fm = extract(text).unwrap();
        assert_eq!(fm.body, "a: 1");
        assert_eq!(strip(text), "body");
    }

    #[test]
    fn test_empty_block() {
        let fm = extract("---\n---\ntext").unwrap();
        assert_eq!(fm.body, "");
        assert_eq!(strip("---\n---\ntext"), "text");
    }

    #[test]
    fn test_block_at_end_of_document() {
        assert_eq!(extract("---\na: 1\n---").unwrap().body, "a: 1");
    }

    #[test]
    fn test_must_start_document() {
        assert!(extract("\n---\na: 1\n---\n").is_none());
        assert!(extract("text\n---\na: 1\n---\n").is_none());
    }

    #[test]
    fn test_closing_marker_must_be_own_line() {
        assert!(extract("---\na: 1\n---more\n").is_none());
        assert!(extract("---\na: 1\n").is_none());
    }

    #[test]
    fn test_strip_without_front_matter() {
        assert_eq!(strip("# Title\n"), "# Title\n");
    }
}
