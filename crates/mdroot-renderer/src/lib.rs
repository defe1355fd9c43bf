//! Markdown rendering with nestable block tags and root-relative images.
//!
//! - [`BlockTagEngine`]: `{% tag params %}` ... `{% endtag %}` blocks with
//!   pluggable [`TagRenderer`]s
//! - [`RenderPipeline`]: front matter pass, tag expansion, image source
//!   prefixing and HTML output via pulldown-cmark
//!
//! # Example
//!
//! ```
//! use mdroot_renderer::BlockTagEngine;
//!
//! let engine = BlockTagEngine::new();
//! let markdown = engine.expand("{% note warning Careful %}\nBody\n{% endnote %}\n");
//! assert!(markdown.contains(r#"<div class="note warning"><p><strong>Careful</strong></p>"#));
//! ```

mod html;
mod pipeline;
pub mod tag;

pub use html::{escape_html, render_inline};
pub use pipeline::{RenderContext, RenderOutput, RenderPipeline};
pub use tag::{BlockTagEngine, BlockTagToken, Nesting, TagRenderer, Token};
