//! Image source classification and root-relative path adjustment.
//!
//! Documents may declare a root hint (a directory that relative image
//! sources are anchored to). [`PathResolver::adjust`] applies that hint to an
//! authored source, and [`PathResolver::to_location`] turns the result into a
//! filesystem location for consumers that need to stat or read the file.
//!
//! Joining is structural: separators are normalized and empty or `.`
//! segments dropped, but `..` segments are kept as written.

use std::borrow::Cow;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

/// URL schemes that are never rewritten.
const EXTERNAL_SCHEMES: &[&str] = &["http://", "https://", "data:", "file://"];

static DRIVE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/]").unwrap());

/// Error returned when a source cannot be mapped to a filesystem location.
///
/// This is distinct from a location that resolves but does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve {path:?}: {reason}")]
    Unresolvable { path: String, reason: &'static str },
}

impl ResolveError {
    fn new(path: &str, reason: &'static str) -> Self {
        Self::Unresolvable {
            path: path.to_owned(),
            reason,
        }
    }
}

/// How an authored image source is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `http`, `https`, `data` or `file` URL.
    External,
    /// Rooted filesystem path (`/x`, `C:\x` or `\\server\x`).
    Absolute,
    /// Everything else; subject to root hint adjustment.
    Relative,
}

impl SourceKind {
    /// Classify a source string.
    #[must_use]
    pub fn of(source: &str) -> Self {
        if is_external_url(source) {
            Self::External
        } else if is_absolute_path(source) {
            Self::Absolute
        } else {
            Self::Relative
        }
    }
}

/// How a root hint is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// Starts with `.`; relative to the document's directory.
    DocumentRelative,
    /// Starts with `/`; relative to the workspace root.
    WorkspaceRelative,
    /// Base URL; sources are joined with `/`.
    External,
    /// Used verbatim as a base directory.
    Base,
}

impl HintKind {
    /// Classify a root hint.
    #[must_use]
    pub fn of(hint: &str) -> Self {
        if hint.starts_with('.') {
            Self::DocumentRelative
        } else if hint.starts_with('/') {
            Self::WorkspaceRelative
        } else if is_external_url(hint) {
            Self::External
        } else {
            Self::Base
        }
    }
}

/// Check whether a source is an external URL.
#[must_use]
pub fn is_external_url(source: &str) -> bool {
    EXTERNAL_SCHEMES.iter().any(|scheme| {
        source
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Check whether a source is a rooted filesystem path.
#[must_use]
pub fn is_absolute_path(source: &str) -> bool {
    source.starts_with('/') || source.starts_with(r"\\") || DRIVE_LETTER.is_match(source)
}

/// Join path fragments structurally with the given separator.
///
/// Only the first non-empty fragment can contribute a root. Empty and `.`
/// segments are dropped; `..` segments are kept. An empty result is `"."`.
#[must_use]
pub fn join_with(parts: &[&str], separator: char) -> String {
    let mut root = "";
    let mut segments: Vec<&str> = Vec::new();
    let mut seen_content = false;

    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !seen_content {
            seen_content = true;
            if part.starts_with(r"\\") {
                root = r"\\";
            } else if part.starts_with(['/', '\\']) {
                root = "/";
            }
        }
        segments.extend(
            part.split(['/', '\\'])
                .filter(|segment| !segment.is_empty() && *segment != "."),
        );
    }

    let mut joined = String::new();
    match root {
        r"\\" => {
            joined.push(separator);
            joined.push(separator);
        }
        "/" => joined.push(separator),
        _ => {}
    }
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            joined.push(separator);
        }
        joined.push_str(segment);
    }

    if joined.is_empty() {
        joined.push('.');
    }
    joined
}

/// Join path fragments with the host separator.
#[must_use]
pub fn join(parts: &[&str]) -> String {
    join_with(parts, MAIN_SEPARATOR)
}

/// Join a source onto an external base URL with `/`.
fn join_url(base: &str, source: &str) -> String {
    let source = source.trim_start_matches("./");
    format!("{}/{}", base.trim_end_matches('/'), source.trim_start_matches('/'))
}

/// Prefix a relative source with a root hint for HTML output.
///
/// Unlike [`PathResolver::adjust`], the hint is used verbatim (HTML already
/// resolves relative to the document) and the result always uses `/`.
#[must_use]
pub fn prefix_source<'a>(source: &'a str, hint: Option<&str>) -> Cow<'a, str> {
    let Some(hint) = hint.filter(|h| !h.is_empty()) else {
        return Cow::Borrowed(source);
    };
    if SourceKind::of(source) != SourceKind::Relative {
        return Cow::Borrowed(source);
    }
    match HintKind::of(hint) {
        HintKind::External => Cow::Owned(join_url(hint, source)),
        _ => Cow::Owned(join_with(&[hint, source], '/')),
    }
}

/// Directory containing a document, as a string.
fn document_dir(document: &Path) -> Cow<'_, str> {
    document
        .parent()
        .map_or(Cow::Borrowed(""), Path::to_string_lossy)
}

/// Applies root hints to image sources relative to a document.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    workspace_root: Option<PathBuf>,
    default_dir: Option<String>,
}

impl PathResolver {
    /// Create a resolver with no workspace root and no default directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace root used for `/`-prefixed hints.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Set the implicit directory used when a document declares no hint.
    #[must_use]
    pub fn with_default_dir(mut self, dir: impl Into<String>) -> Self {
        self.default_dir = Some(dir.into());
        self
    }

    /// Workspace root, if configured.
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// Compute the effective path for an authored source.
    ///
    /// External URLs and absolute paths are returned unchanged. Without a
    /// hint (and without a default directory) the source is returned
    /// unchanged as well.
    #[must_use]
    pub fn adjust(&self, source: &str, hint: Option<&str>, document: &Path) -> String {
        if SourceKind::of(source) != SourceKind::Relative {
            return source.to_owned();
        }
        let hint = hint
            .filter(|h| !h.is_empty())
            .or(self.default_dir.as_deref());
        let Some(hint) = hint else {
            return source.to_owned();
        };

        let adjusted = self.apply_hint(source, hint, document);
        if adjusted != source {
            tracing::debug!(source, hint, adjusted = %adjusted, "Adjusted image path");
        }
        adjusted
    }

    fn apply_hint(&self, source: &str, hint: &str, document: &Path) -> String {
        match HintKind::of(hint) {
            HintKind::DocumentRelative => {
                let dir = document_dir(document);
                join(&[dir.as_ref(), hint, source])
            }
            HintKind::WorkspaceRelative => match &self.workspace_root {
                Some(root) => join(&[root.to_string_lossy().as_ref(), &hint[1..], source]),
                None => source.to_owned(),
            },
            HintKind::External => join_url(hint, source),
            HintKind::Base => join(&[hint, source]),
        }
    }

    /// Convert an effective path into a filesystem location.
    ///
    /// Relative paths are anchored at the document's directory and
    /// percent-escapes are decoded.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unresolvable`] for empty sources, non-file
    /// URLs, invalid percent-encoding, or a relative path whose document has
    /// no directory.
    pub fn to_location(&self, effective: &str, document: &Path) -> Result<PathBuf, ResolveError> {
        if effective.trim().is_empty() {
            return Err(ResolveError::new(effective, "empty source"));
        }

        let path = match effective.get(..7) {
            Some(scheme) if scheme.eq_ignore_ascii_case("file://") => &effective[7..],
            _ if is_external_url(effective) => {
                return Err(ResolveError::new(effective, "not a filesystem location"));
            }
            _ => effective,
        };

        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map_err(|_| ResolveError::new(effective, "invalid percent-encoding"))?;

        if is_absolute_path(&decoded) {
            return Ok(PathBuf::from(join(&[decoded.as_ref()])));
        }

        let dir = document_dir(document);
        if dir.is_empty() {
            return Err(ResolveError::new(effective, "document has no directory"));
        }
        Ok(PathBuf::from(join(&[dir.as_ref(), decoded.as_ref()])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn native(path: &str) -> String {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }

    fn doc() -> &'static Path {
        Path::new("/ws/docs/page.md")
    }

    #[test]
    fn test_classify() {
        assert_eq!(SourceKind::of("http://x/y.png"), SourceKind::External);
        assert_eq!(SourceKind::of("HTTPS://x/y.png"), SourceKind::External);
        assert_eq!(SourceKind::of("data:image/png;base64,AA"), SourceKind::External);
        assert_eq!(SourceKind::of("file:///tmp/a.png"), SourceKind::External);
        assert_eq!(SourceKind::of("/abs/a.png"), SourceKind::Absolute);
        assert_eq!(SourceKind::of(r"C:\img\a.png"), SourceKind::Absolute);
        assert_eq!(SourceKind::of(r"\\server\share\a.png"), SourceKind::Absolute);
        assert_eq!(SourceKind::of("img/a.png"), SourceKind::Relative);
        assert_eq!(SourceKind::of("./a.png"), SourceKind::Relative);
        assert_eq!(SourceKind::of("ftp.png"), SourceKind::Relative);
    }

    #[test]
    fn test_hint_kind() {
        assert_eq!(HintKind::of("./assets"), HintKind::DocumentRelative);
        assert_eq!(HintKind::of("../up"), HintKind::DocumentRelative);
        assert_eq!(HintKind::of("/shared"), HintKind::WorkspaceRelative);
        assert_eq!(HintKind::of("https://cdn.example.com"), HintKind::External);
        assert_eq!(HintKind::of("media"), HintKind::Base);
    }

    #[test]
    fn test_join_keeps_parent_segments() {
        assert_eq!(join_with(&["a/./b", "../c.png"], '/'), "a/b/../c.png");
        assert_eq!(join_with(&["/root/", "x"], '/'), "/root/x");
        assert_eq!(join_with(&[r"a\b", "c"], '/'), "a/b/c");
        assert_eq!(join_with(&["", "./"], '/'), ".");
        assert_eq!(join_with(&[r"\\srv\share", "a"], '\\'), r"\\srv\share\a");
    }

    #[test]
    fn test_external_url_never_rewritten() {
        let resolver = PathResolver::new().with_workspace_root("/ws");
        for hint in [None, Some("./assets"), Some("/shared"), Some("img")] {
            assert_eq!(resolver.adjust("http://x/y.png", hint, doc()), "http://x/y.png");
        }
    }

    #[test]
    fn test_absolute_never_rewritten() {
        let resolver = PathResolver::new();
        assert_eq!(resolver.adjust("/abs/a.png", Some("./assets"), doc()), "/abs/a.png");
        assert_eq!(resolver.adjust(r"D:\a.png", Some("img"), doc()), r"D:\a.png");
    }

    #[test]
    fn test_no_hint_is_passthrough() {
        let resolver = PathResolver::new();
        assert_eq!(resolver.adjust("img.png", None, doc()), "img.png");
        assert_eq!(resolver.adjust("img.png", Some(""), doc()), "img.png");
    }

    #[test]
    fn test_dot_hint_relative_to_document() {
        let resolver = PathResolver::new();
        assert_eq!(
            resolver.adjust("img.png", Some("./assets"), doc()),
            native("/ws/docs/assets/img.png")
        );
        assert_eq!(
            resolver.adjust("img.png", Some("../shared"), doc()),
            native("/ws/docs/../shared/img.png")
        );
    }

    #[test]
    fn test_slash_hint_uses_workspace_root() {
        let resolver = PathResolver::new().with_workspace_root("/ws");
        assert_eq!(
            resolver.adjust("img.png", Some("/shared"), doc()),
            native("/ws/shared/img.png")
        );
    }

    #[test]
    fn test_slash_hint_without_workspace_root_is_inapplicable() {
        let resolver = PathResolver::new();
        assert_eq!(resolver.adjust("img.png", Some("/shared"), doc()), "img.png");
    }

    #[test]
    fn test_verbatim_hint() {
        let resolver = PathResolver::new();
        assert_eq!(
            resolver.adjust("img.png", Some("media"), doc()),
            native("media/img.png")
        );
        assert_eq!(
            resolver.adjust("./img.png", Some("https://cdn.example.com/docs/"), doc()),
            "https://cdn.example.com/docs/img.png"
        );
    }

    #[test]
    fn test_default_dir_applies_only_without_hint() {
        let resolver = PathResolver::new().with_default_dir("./images");
        assert_eq!(
            resolver.adjust("a.png", None, doc()),
            native("/ws/docs/images/a.png")
        );
        assert_eq!(
            resolver.adjust("a.png", Some("media"), doc()),
            native("media/a.png")
        );
    }

    #[test]
    fn test_prefix_source_for_html() {
        assert_eq!(prefix_source("a.png", Some("./assets")), "assets/a.png");
        assert_eq!(prefix_source("a.png", Some("/shared")), "/shared/a.png");
        assert_eq!(prefix_source("sub/a.png", Some(r"img\dir")), "img/dir/sub/a.png");
        assert_eq!(prefix_source("a.png", None), "a.png");
        assert_eq!(prefix_source("/abs.png", Some("x")), "/abs.png");
        assert_eq!(prefix_source("https://e.com/a.png", Some("x")), "https://e.com/a.png");
    }

    #[test]
    fn test_to_location_anchors_relative_paths() {
        let resolver = PathResolver::new();
        assert_eq!(
            resolver.to_location("assets/a%20b.png", doc()),
            Ok(PathBuf::from(native("/ws/docs/assets/a b.png")))
        );
        assert_eq!(
            resolver.to_location("/ws/x.png", doc()),
            Ok(PathBuf::from(native("/ws/x.png")))
        );
        assert_eq!(
            resolver.to_location("file:///tmp/a.png", doc()),
            Ok(PathBuf::from(native("/tmp/a.png")))
        );
    }

    #[test]
    fn test_to_location_reports_unresolvable() {
        let resolver = PathResolver::new();
        for source in ["", "   ", "https://e.com/a.png", "data:image/png;base64,AA", "bad%FF.png"] {
            assert!(
                matches!(
                    resolver.to_location(source, doc()),
                    Err(ResolveError::Unresolvable { .. })
                ),
                "{source:?} should be unresolvable"
            );
        }
        assert!(resolver.to_location("a.png", Path::new("")).is_err());
    }
}
