//! Tag renderers: the trait, built-in tags and the fallback.

use super::tokens::BlockTagToken;
use crate::html::{escape_html, render_inline};

/// Renders the opening and closing markup of one tag.
///
/// Output is inserted into the document as an HTML block, so it must not
/// contain blank lines. An empty string emits nothing.
///
/// # Example
///
/// ```
/// use mdroot_renderer::{BlockTagEngine, BlockTagToken, TagRenderer};
///
/// struct Details;
///
/// impl TagRenderer for Details {
///     fn open(&self, token: &BlockTagToken) -> String {
///         format!("<details><summary>{}</summary>", token.params)
///     }
///
///     fn close(&self, _token: &BlockTagToken) -> String {
///         "</details>".to_owned()
///     }
/// }
///
/// let engine = BlockTagEngine::new().with_renderer("details", Details);
/// let markdown = engine.expand("{% details More %}\nHidden\n{% enddetails %}\n");
/// assert!(markdown.contains("<details><summary>More</summary>"));
/// ```
pub trait TagRenderer: Send + Sync {
    /// Markup for an opening token.
    fn open(&self, token: &BlockTagToken) -> String;

    /// Markup for the matching closing token.
    fn close(&self, token: &BlockTagToken) -> String;
}

/// Semantic variants accepted as the first `note` parameter.
const NOTE_VARIANTS: &[&str] = &["success", "info", "primary", "warning", "danger"];

/// `{% note [variant] [summary] %}`: a styled callout box.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoteTag;

impl TagRenderer for NoteTag {
    fn open(&self, token: &BlockTagToken) -> String {
        let params = token.params.trim();
        let (first, rest) = params
            .split_once(char::is_whitespace)
            .map_or((params, ""), |(first, rest)| (first, rest.trim()));

        let (class, summary) = if NOTE_VARIANTS.contains(&first) {
            (format!("note {first}"), rest)
        } else {
            ("note".to_owned(), params)
        };

        if summary.is_empty() {
            format!(r#"<div class="{class}">"#)
        } else {
            format!(
                r#"<div class="{class}"><p><strong>{}</strong></p>"#,
                render_inline(summary)
            )
        }
    }

    fn close(&self, _token: &BlockTagToken) -> String {
        "</div>".to_owned()
    }
}

/// `{% cq %}`: a centered quote.
#[derive(Debug, Default, Clone, Copy)]
pub struct CenterQuoteTag;

impl TagRenderer for CenterQuoteTag {
    fn open(&self, _token: &BlockTagToken) -> String {
        r#"<blockquote class="blockquote-center">"#.to_owned()
    }

    fn close(&self, _token: &BlockTagToken) -> String {
        "</blockquote>".to_owned()
    }
}

/// `{% gp %}`: groups content without any wrapper.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupTag;

impl TagRenderer for GroupTag {
    fn open(&self, _token: &BlockTagToken) -> String {
        String::new()
    }

    fn close(&self, _token: &BlockTagToken) -> String {
        String::new()
    }
}

/// Fallback for tags without a renderer: shows the marker as escaped text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralTag;

impl TagRenderer for LiteralTag {
    fn open(&self, token: &BlockTagToken) -> String {
        if token.params.is_empty() {
            format!("<p>{{% {} %}}</p>", token.tag)
        } else {
            format!("<p>{{% {} {} %}}</p>", token.tag, escape_html(&token.params))
        }
    }

    fn close(&self, token: &BlockTagToken) -> String {
        format!("<p>{{% end{} %}}</p>", token.tag)
    }
}

/// Built-in renderer for a tag name.
pub(crate) fn builtin(tag: &str) -> Option<&'static dyn TagRenderer> {
    match tag {
        "note" => Some(&NoteTag),
        "cq" => Some(&CenterQuoteTag),
        "gp" => Some(&GroupTag),
        _ => None,
    }
}
