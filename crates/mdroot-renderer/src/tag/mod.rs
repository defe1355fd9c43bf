//! Nestable `{% tag %}` ... `{% endtag %}` blocks.
//!
//! # Architecture
//!
//! Processing runs before markdown parsing:
//!
//! 1. **Tokenizing**: marker lines are matched with a nesting-aware
//!    lookahead within the blockquote or list item they sit in. Matched
//!    pairs become [`BlockTagToken`]s; everything else, including unmatched
//!    openings and markers in code, stays markdown.
//!
//! 2. **Expansion** ([`BlockTagEngine::expand`]): each tag token is replaced
//!    by its renderer's markup as a standalone HTML block, which
//!    pulldown-cmark passes through unchanged while still parsing the
//!    markdown between the markers. The block repeats the marker line's
//!    container prefix so it stays inside that container.
//!
//! Renderers are resolved by tag name: registered renderers first, then the
//! built-in `note`, `cq` and `gp`, then [`LiteralTag`], which shows the
//! marker as escaped text.

mod fence;
mod lines;
mod renderer;
mod scanner;
mod syntax;
mod tokenizer;
mod tokens;

use std::collections::HashMap;

pub use renderer::{CenterQuoteTag, GroupTag, LiteralTag, NoteTag, TagRenderer};
pub use tokens::{BlockTagToken, Nesting, Token};

/// Block tag tokenizer and renderer registry.
#[derive(Default)]
pub struct BlockTagEngine {
    renderers: HashMap<String, Box<dyn TagRenderer>>,
}

impl BlockTagEngine {
    /// Create an engine with only the built-in tags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer for a tag name, taking precedence over built-ins.
    #[must_use]
    pub fn with_renderer(
        mut self,
        tag: impl Into<String>,
        renderer: impl TagRenderer + 'static,
    ) -> Self {
        self.renderers.insert(tag.into(), Box::new(renderer));
        self
    }

    /// Split a document into markdown runs and matched tag tokens.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenizer::tokenize(text)
    }

    /// Check whether the given line opens a block that is closed later in
    /// `text`, without producing tokens.
    #[must_use]
    pub fn matches_at(&self, text: &str, line: usize) -> bool {
        scanner::matches_at(&lines::classify(text), line)
    }

    /// Renderer used for a tag name.
    #[must_use]
    pub fn renderer_for(&self, tag: &str) -> &dyn TagRenderer {
        if let Some(renderer) = self.renderers.get(tag) {
            return renderer.as_ref();
        }
        renderer::builtin(tag).unwrap_or(&LiteralTag)
    }

    /// Markup for a single tag token.
    #[must_use]
    pub fn render_token(&self, token: &BlockTagToken) -> String {
        let renderer = self.renderer_for(&token.tag);
        match token.nesting {
            Nesting::Open => renderer.open(token),
            Nesting::Close => renderer.close(token),
        }
    }

    /// Replace matched tag blocks with their markup.
    ///
    /// The result is markdown with embedded HTML blocks, ready for a
    /// CommonMark parser.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for token in self.tokenize(text) {
            match token {
                Token::Markdown(markdown) => out.push_str(&markdown),
                Token::Tag(tag) => push_block(&mut out, &tag.prefix, &self.render_token(&tag)),
            }
        }
        out
    }
}

/// Append tag markup as an HTML block inside the container given by
/// `prefix`.
///
/// Blank lines on both sides keep the markup a block of its own and let
/// markdown resume after it. The first line repeats the marker's prefix;
/// later lines use it with list markers blanked out.
fn push_block(out: &mut String, prefix: &str, markup: &str) {
    let continuation: String = prefix
        .chars()
        .map(|c| if c == '>' || c.is_whitespace() { c } else { ' ' })
        .collect();
    let blank = continuation.trim_end();

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(blank);
    out.push('\n');

    if markup.is_empty() {
        // A list marker still has to open its item.
        if continuation != prefix {
            out.push_str(prefix.trim_end());
            out.push('\n');
        }
        return;
    }

    for (idx, line) in markup.lines().enumerate() {
        out.push_str(if idx == 0 { prefix } else { continuation.as_str() });
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(blank);
    out.push('\n');
}

impl std::fmt::Debug for BlockTagEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("BlockTagEngine")
            .field("renderers", &tags)
            .finish()
    }
}
