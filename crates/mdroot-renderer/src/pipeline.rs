//! Document rendering: front matter, block tags, image sources, HTML.

use std::sync::Arc;

use mdroot_meta::{FrontMatterStore, RootHint, front_matter};
use mdroot_paths::prefix_source;
use pulldown_cmark::{CowStr, Event, Parser, Tag, html};

use crate::html::markdown_options;
use crate::tag::{BlockTagEngine, TagRenderer};

/// Per-render state derived from one document snapshot.
///
/// Produced by [`RenderPipeline::context_for`] and consumed by
/// [`RenderPipeline::render_with`] for the same text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    root_hint: Option<RootHint>,
}

impl RenderContext {
    /// Create a context with an explicit root hint.
    #[must_use]
    pub fn new(root_hint: Option<RootHint>) -> Self {
        Self { root_hint }
    }

    /// Root hint applied to relative image sources.
    #[must_use]
    pub fn root_hint(&self) -> Option<&RootHint> {
        self.root_hint.as_ref()
    }
}

/// Result of rendering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub html: String,
    /// Root hint the image sources were prefixed with.
    pub root_hint: Option<RootHint>,
}

/// Renders markdown documents to HTML.
///
/// # Example
///
/// ```
/// use mdroot_renderer::RenderPipeline;
///
/// let pipeline = RenderPipeline::new();
/// let doc = "---\ntypora-root-url: ./assets\n---\n{% note info Tip %}\n![x](a.png)\n{% endnote %}\n";
/// let output = pipeline.render("guide.md", doc);
///
/// assert!(output.html.contains(r#"<div class="note info"><p><strong>Tip</strong></p>"#));
/// assert!(output.html.contains(r#"src="assets/a.png""#));
/// ```
#[derive(Debug)]
pub struct RenderPipeline {
    store: Arc<FrontMatterStore>,
    engine: BlockTagEngine,
}

impl RenderPipeline {
    /// Create a pipeline with its own front matter store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(FrontMatterStore::new()))
    }

    /// Create a pipeline sharing an existing front matter store.
    #[must_use]
    pub fn with_store(store: Arc<FrontMatterStore>) -> Self {
        Self {
            store,
            engine: BlockTagEngine::new(),
        }
    }

    /// Replace the block tag engine.
    #[must_use]
    pub fn with_engine(mut self, engine: BlockTagEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Register a tag renderer.
    #[must_use]
    pub fn with_renderer(
        mut self,
        tag: impl Into<String>,
        renderer: impl TagRenderer + 'static,
    ) -> Self {
        self.engine = self.engine.with_renderer(tag, renderer);
        self
    }

    /// Front matter store, for invalidation on document changes.
    #[must_use]
    pub fn store(&self) -> &FrontMatterStore {
        &self.store
    }

    /// Block tag engine.
    #[must_use]
    pub fn engine(&self) -> &BlockTagEngine {
        &self.engine
    }

    /// Front matter pass: resolve the root hint for a document snapshot.
    #[must_use]
    pub fn context_for(&self, document_id: &str, text: &str) -> RenderContext {
        RenderContext::new(self.store.resolve_root_hint(document_id, text))
    }

    /// Render pass: front matter is dropped, block tags expanded and
    /// relative image sources prefixed with the context's root hint.
    #[must_use]
    pub fn render_with(&self, text: &str, ctx: &RenderContext) -> String {
        let body = front_matter::strip(text);
        let expanded = self.engine.expand(body);
        let hint = ctx.root_hint().map(RootHint::as_str);

        let events = Parser::new_ext(&expanded, markdown_options()).map(|event| match event {
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: prefix_image(dest_url, hint),
                title,
                id,
            }),
            other => other,
        });

        let mut out = String::with_capacity(expanded.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }

    /// Render a document, running both passes on the same text.
    #[must_use]
    pub fn render(&self, document_id: &str, text: &str) -> RenderOutput {
        let ctx = self.context_for(document_id, text);
        let html = self.render_with(text, &ctx);
        RenderOutput {
            html,
            root_hint: ctx.root_hint,
        }
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn prefix_image<'a>(dest_url: CowStr<'a>, hint: Option<&str>) -> CowStr<'a> {
    let rewritten = match prefix_source(&dest_url, hint) {
        std::borrow::Cow::Owned(url) => Some(url),
        std::borrow::Cow::Borrowed(_) => None,
    };
    match rewritten {
        Some(url) => {
            tracing::debug!(from = %dest_url, to = %url, "Prefixed image source");
            CowStr::from(url)
        }
        None => dest_url,
    }
}
