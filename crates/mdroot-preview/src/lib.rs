//! Image links, hover previews and display sizing for markdown editors.
//!
//! [`ImagePreviewer`] combines the front matter root hint, path adjustment,
//! file access and image probing:
//!
//! - [`ImagePreviewer::links`]: navigable ranges over each image source
//! - [`ImagePreviewer::hover`]: preview markdown for the image under a cursor
//!
//! Both fail open: a source that cannot be resolved, found or read simply
//! produces no link or no preview.

mod display;
mod reference;
mod source;
mod uri;

use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mdroot_meta::{FrontMatterStore, RootHint};
use mdroot_paths::{PathResolver, ResolveError, SourceKind, is_external_url};
use mdroot_probe::ImageDimensions;

pub use display::{DisplayPolicy, DisplaySize};
pub use reference::{ImageReference, at_offset, scan};
pub use source::{AssetSource, FsAssetSource, MockAssetSource};
pub use uri::file_uri;

/// Error while locating or loading an image for preview.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A navigable image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    /// Byte range of the source text in the document.
    pub range: Range<usize>,
    /// Filesystem location the source points to.
    pub target: PathBuf,
    pub tooltip: String,
}

/// Preview for the image under a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHover {
    /// Markdown showing the image, e.g. `![alt](file:///x.png|height=240)`.
    pub markdown: String,
    /// Byte range of the whole image reference.
    pub range: Range<usize>,
    /// Probed size, if the header was readable.
    pub dimensions: Option<ImageDimensions>,
}

/// A document snapshot as seen by preview features.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    /// Stable identity for the front matter cache.
    pub id: &'a str,
    /// Filesystem location of the document.
    pub path: &'a Path,
    pub text: &'a str,
}

/// Image links and hover previews.
pub struct ImagePreviewer {
    store: Arc<FrontMatterStore>,
    resolver: PathResolver,
    assets: Arc<dyn AssetSource>,
    policy: DisplayPolicy,
}

impl ImagePreviewer {
    /// Create a previewer reading from the local filesystem.
    #[must_use]
    pub fn new(store: Arc<FrontMatterStore>, resolver: PathResolver) -> Self {
        Self {
            store,
            resolver,
            assets: Arc::new(FsAssetSource),
            policy: DisplayPolicy::default(),
        }
    }

    /// Use a different asset source.
    #[must_use]
    pub fn with_assets(mut self, assets: Arc<dyn AssetSource>) -> Self {
        self.assets = assets;
        self
    }

    /// Use a different display policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DisplayPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn root_hint(&self, doc: &DocumentView<'_>) -> Option<RootHint> {
        self.store.resolve_root_hint(doc.id, doc.text)
    }

    /// Adjust a source with the document's hint and locate it on disk.
    fn locate(
        &self,
        source: &str,
        hint: Option<&RootHint>,
        doc: &DocumentView<'_>,
    ) -> Result<(String, PathBuf), PreviewError> {
        let adjusted = self
            .resolver
            .adjust(source, hint.map(RootHint::as_str), doc.path);
        let location = self.resolver.to_location(&adjusted, doc.path)?;
        Ok((adjusted, location))
    }

    /// Collect navigable links for every local image source in a document.
    ///
    /// External URLs and absolute paths are skipped.
    #[must_use]
    pub fn links(&self, doc: &DocumentView<'_>) -> Vec<ImageLink> {
        let hint = self.root_hint(doc);
        scan(doc.text)
            .into_iter()
            .filter(|r| SourceKind::of(&r.source) == SourceKind::Relative)
            .filter_map(|r| match self.locate(&r.source, hint.as_ref(), doc) {
                Ok((adjusted, target)) => Some(ImageLink {
                    range: r.source_range,
                    target,
                    tooltip: format!("Open: {adjusted}"),
                }),
                Err(e) => {
                    tracing::debug!(source = %r.source, error = %e, "Skipping image link");
                    None
                }
            })
            .collect()
    }

    /// Build a preview for the image reference covering `offset`.
    ///
    /// Returns `None` for external URLs, unresolvable sources and missing
    /// files. Images whose size cannot be read are previewed with the
    /// height constraint.
    #[must_use]
    pub fn hover(&self, doc: &DocumentView<'_>, offset: usize) -> Option<ImageHover> {
        let reference = at_offset(doc.text, offset)?;
        if is_external_url(&reference.source) {
            return None;
        }

        let hint = self.root_hint(doc);
        let (_, location) = match self.locate(&reference.source, hint.as_ref(), doc) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(source = %reference.source, error = %e, "No hover preview");
                return None;
            }
        };
        if !self.assets.exists(&location) {
            tracing::debug!(path = %location.display(), "Image not found, no hover preview");
            return None;
        }

        let dimensions = match self.load_dimensions(&location) {
            Ok(dims) => dims,
            Err(e) => {
                tracing::warn!(path = %location.display(), error = %e, "Failed to read image");
                None
            }
        };
        let size = self.policy.choose(dimensions);

        Some(ImageHover {
            markdown: format!("![{}]({}{size})", reference.alt, file_uri(&location)),
            range: reference.range,
            dimensions,
        })
    }

    fn load_dimensions(&self, location: &Path) -> Result<Option<ImageDimensions>, PreviewError> {
        let bytes = self.assets.read(location)?;
        Ok(mdroot_probe::probe(&bytes))
    }
}

impl std::fmt::Debug for ImagePreviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePreviewer")
            .field("resolver", &self.resolver)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
