//! Front matter handling for Markdown documents.
//!
//! Documents can declare where their relative image sources are anchored
//! with a front matter key (by default `typora-root-url`):
//!
//! ```markdown
//! ---
//! typora-root-url: ./assets
//! ---
//! ![diagram](flow.png)
//! ```
//!
//! [`FrontMatterStore`] reads that key through a [`FrontMatterParser`] and
//! caches the resulting [`RootHint`] per document.

pub mod front_matter;
mod parser;
mod store;

use std::fmt;

pub use parser::{FrontMatterError, FrontMatterMap, FrontMatterParser, YamlFrontMatterParser};
pub use store::{DEFAULT_ROOT_KEY, DEFAULT_TTL, FrontMatterStore};

/// Directory a document's relative image sources are anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootHint(String);

impl RootHint {
    /// Wrap a hint string.
    #[must_use]
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    /// The hint as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RootHint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
