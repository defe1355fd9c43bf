//! `![alt](src)` references in document text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static IMAGE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// An image reference as written in a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub alt: String,
    /// Source exactly as authored.
    pub source: String,
    /// Byte range of the whole `![alt](src)` markup.
    pub range: Range<usize>,
    /// Byte range of `src` within the document.
    pub source_range: Range<usize>,
}

impl ImageReference {
    /// Check whether a byte offset falls within the reference markup.
    #[must_use]
    pub fn covers(&self, offset: usize) -> bool {
        self.range.contains(&offset)
    }
}

/// Find all image references in a document.
#[must_use]
pub fn scan(text: &str) -> Vec<ImageReference> {
    IMAGE_REFERENCE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let alt = caps.get(1)?.as_str();
            let source = caps.get(2)?.as_str();
            // `![` + alt + `](` precede the source; `)` follows it.
            let source_start = whole.start() + 2 + alt.len() + 2;
            let source_end = whole.end() - 1;
            Some(ImageReference {
                alt: alt.to_owned(),
                source: source.to_owned(),
                range: whole.range(),
                source_range: source_start..source_end,
            })
        })
        .collect()
}

/// Find the reference covering a byte offset.
#[must_use]
pub fn at_offset(text: &str, offset: usize) -> Option<ImageReference> {
    scan(text).into_iter().find(|r| r.covers(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_range_is_exact() {
        let text = "Intro ![Flow chart](img/flow.png) end";
        let refs = scan(text);
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.alt, "Flow chart");
        assert_eq!(&text[r.source_range.clone()], "img/flow.png");
        assert_eq!(&text[r.range.clone()], "![Flow chart](img/flow.png)");
    }

    #[test]
    fn test_empty_alt_and_multiple() {
        let text = "![](a.png)\n![b](b.png)";
        let refs = scan(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(&text[refs[0].source_range.clone()], "a.png");
        assert_eq!(&text[refs[1].source_range.clone()], "b.png");
    }

    #[test]
    fn test_multibyte_alt_offsets() {
        let text = "é ![日本](x.png)";
        let r = &scan(text)[0];
        assert_eq!(&text[r.source_range.clone()], "x.png");
    }

    #[test]
    fn test_links_and_empty_sources_ignored() {
        assert!(scan("[not image](a.png) ![x]()").is_empty());
    }

    #[test]
    fn test_at_offset() {
        let text = "a ![x](one.png) b ![y](two.png)";
        assert_eq!(at_offset(text, 3).unwrap().source, "one.png");
        assert_eq!(at_offset(text, 20).unwrap().source, "two.png");
        assert!(at_offset(text, 0).is_none());
        assert!(at_offset(text, 16).is_none());
    }
}
